//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::models::{Order, OrderDetail};
use crate::orders::{
    ChangeStatusRequest, CreateOrderRequest, CreateOrderResponse, OrderPaginationQuery, Paginated,
};
use crate::services::PaymentSession;
use crate::utils::AppResult;

/// Create an order and initiate its payment session
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<CreateOrderResponse>> {
    let response = state.orders.create(payload).await?;
    Ok(Json(response))
}

/// Paginated order list with optional status filter
pub async fn find_all(
    State(state): State<ServerState>,
    Query(query): Query<OrderPaginationQuery>,
) -> AppResult<Json<Paginated<Order>>> {
    let page = state.orders.find_all(query).await?;
    Ok(Json(page))
}

/// Single order with items and live catalog names
pub async fn find_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let order = state.orders.find_one(&id).await?;
    Ok(Json(order))
}

/// Explicit status transition
pub async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ChangeStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.orders.change_status(&id, payload.status).await?;
    Ok(Json(order))
}

/// Retry payment-session creation for a committed order
pub async fn retry_payment_session(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentSession>> {
    let session = state.orders.create_payment_session(&id).await?;
    Ok(Json(session))
}
