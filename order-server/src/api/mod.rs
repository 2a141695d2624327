//! API Module
//!
//! Thin axum handlers mapping the platform contracts onto the
//! orders service. No business logic lives here.

pub mod health;
pub mod orders;
pub mod payments;

use crate::core::ServerState;
use axum::Router;

/// Compose the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(payments::router())
        .with_state(state)
}
