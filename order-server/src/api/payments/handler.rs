//! Payment event handlers

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::orders::PaymentSucceededEvent;
use crate::utils::AppResult;

/// Apply a payment-confirmed event to its order.
///
/// Redelivery of the same event is acknowledged without effect; a
/// conflicting charge id is rejected with the consistency-violation
/// envelope so the event source can alert.
pub async fn payment_succeeded(
    State(state): State<ServerState>,
    Json(event): Json<PaymentSucceededEvent>,
) -> AppResult<Json<Value>> {
    let order = state.orders.apply_payment_confirmed(event).await?;
    Ok(Json(json!({ "orderId": order.id, "status": order.status })))
}
