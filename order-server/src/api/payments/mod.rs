//! Payment event API Module
//!
//! Inbound channel for the asynchronous payment-confirmed event.
//! Delivery is at-least-once; the handler is idempotent.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/payments/succeeded", post(handler::payment_succeeded))
}
