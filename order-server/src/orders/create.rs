//! Order creation saga
//!
//! Catalog validation → pricing → atomic persistence → payment
//! session. A payment-session failure leaves the committed PENDING
//! order in place; the caller retries session creation instead of
//! losing the order.

use super::OrdersService;
use crate::db::models::{NewOrder, NewOrderItem, OrderDetail};
use crate::services::{PaymentSession, PaymentSessionItem, PaymentSessionRequest};
use crate::utils::validation::{validate_quantity, validate_required_text, MAX_ID_LEN};
use crate::utils::{money, AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

/// Requested line item. `price` is accepted for contract
/// compatibility but ignored: only catalog-resolved prices enter
/// the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: String,
    #[serde(default)]
    pub price: Option<f64>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItem>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::validation("items must not be empty"));
        }
        for item in &self.items {
            validate_required_text(&item.product_id, "productId", MAX_ID_LEN)?;
            validate_quantity(item.quantity)?;
        }
        Ok(())
    }
}

/// Saga result: the hydrated order plus the payment-session
/// descriptor. `payment_session` is null and `payment_error` set
/// when the gateway call failed after the order committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order: OrderDetail,
    pub payment_session: Option<PaymentSession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_error: Option<String>,
}

impl OrdersService {
    /// Create an order.
    ///
    /// 1. Validate the requested items against the catalog — every
    ///    distinct product id must resolve, or the whole request
    ///    fails before anything is written.
    /// 2. Compute totals from catalog prices.
    /// 3. Persist header + items in one transaction, status PENDING.
    /// 4. Request a payment session for the persisted items.
    ///
    /// No internal retries; request-level retry policy belongs to
    /// the transport layer.
    pub async fn create(&self, request: CreateOrderRequest) -> AppResult<CreateOrderResponse> {
        request.validate()?;

        let product_ids = distinct_ids(&request.items);
        let products = self.catalog.validate_products(&product_ids).await?;
        let by_id: HashMap<&str, (&str, f64)> = products
            .iter()
            .map(|p| (p.id.as_str(), (p.name.as_str(), p.price)))
            .collect();

        // Resolve authoritative price per requested item. The adapter
        // already guarantees coverage; an omission here is still a
        // hard failure, never a partial order.
        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let (_, price) = by_id.get(item.product_id.as_str()).ok_or_else(|| {
                AppError::not_found(format!("Products not found: {}", item.product_id))
            })?;
            items.push(NewOrderItem {
                product_id: item.product_id.clone(),
                price: *price,
                quantity: item.quantity,
            });
        }

        let (total_amount, total_items) =
            money::order_totals(items.iter().map(|i| (i.price, i.quantity)));

        let new_order = NewOrder {
            id: Uuid::new_v4().to_string(),
            total_amount,
            total_items,
            items,
        };
        let record = self.repo.create(new_order).await?;
        info!(
            order_id = %record.order.id,
            total_amount,
            total_items,
            "Order created"
        );

        let session_request = PaymentSessionRequest {
            order_id: record.order.id.clone(),
            currency: self.currency.clone(),
            items: record
                .items
                .iter()
                .map(|item| PaymentSessionItem {
                    name: by_id
                        .get(item.product_id.as_str())
                        .map(|(name, _)| (*name).to_string())
                        .unwrap_or_default(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
        };

        // The order is committed; a gateway failure is reported to
        // the caller, not rolled back.
        let (payment_session, payment_error) =
            match self.payment.create_session(&session_request).await {
                Ok(session) => (Some(session), None),
                Err(e) => {
                    warn!(
                        order_id = %record.order.id,
                        error = %e,
                        "Payment session creation failed; order stays PENDING"
                    );
                    (None, Some(e.to_string()))
                }
            };

        let order = OrderDetail::hydrate(record, |id| {
            by_id
                .get(id)
                .map(|(name, _)| (*name).to_string())
                .unwrap_or_default()
        });

        Ok(CreateOrderResponse {
            order,
            payment_session,
            payment_error,
        })
    }

    /// Retry payment-session creation for an already-committed order.
    /// Item names are re-resolved live from the catalog.
    pub async fn create_payment_session(&self, order_id: &str) -> AppResult<PaymentSession> {
        let record = self
            .repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order with id {order_id} not found")))?;

        if record.order.paid {
            return Err(AppError::BusinessRule(format!(
                "Order {order_id} is already paid"
            )));
        }

        let product_ids: Vec<String> = record
            .items
            .iter()
            .map(|item| item.product_id.clone())
            .collect();
        let products = self.catalog.validate_products(&product_ids).await?;
        let name_of: HashMap<&str, &str> = products
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();

        let session_request = PaymentSessionRequest {
            order_id: record.order.id.clone(),
            currency: self.currency.clone(),
            items: record
                .items
                .iter()
                .map(|item| PaymentSessionItem {
                    name: name_of
                        .get(item.product_id.as_str())
                        .map(|name| (*name).to_string())
                        .unwrap_or_default(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
        };

        Ok(self.payment.create_session(&session_request).await?)
    }
}

/// Distinct product ids, first-seen order preserved
fn distinct_ids(items: &[CreateOrderItem]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.product_id.as_str()))
        .map(|item| item.product_id.clone())
        .collect()
}
