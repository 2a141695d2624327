//! Order API Module

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::find_all))
        .route("/{id}", get(handler::find_one))
        .route("/{id}/status", patch(handler::change_status))
        .route("/{id}/payment-session", post(handler::retry_payment_session))
}
