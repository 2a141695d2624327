//! Order status state machine
//!
//! Explicit status transitions and the idempotent application of
//! payment-confirmed events. Same-order races are resolved with
//! conditional updates; the transition graph itself is a pluggable
//! deployment hook.

use super::OrdersService;
use crate::db::models::{Order, OrderStatus};
use crate::utils::validation::{validate_required_text, MAX_ID_LEN, MAX_URL_LEN};
use crate::utils::{AppError, AppResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Deployment hook for transition-graph validation.
///
/// The core only guarantees monotonicity and idempotence; which
/// edges are legal is deployment-defined.
pub trait TransitionPolicy: Send + Sync {
    fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool;
}

/// Default policy: every transition is allowed
pub struct AllowAll;

impl TransitionPolicy for AllowAll {
    fn allows(&self, _from: OrderStatus, _to: OrderStatus) -> bool {
        true
    }
}

/// Sample forward-only policy:
/// `PENDING → {PAID, CANCELLED}`, `PAID → {DELIVERED}`,
/// `DELIVERED` and `CANCELLED` terminal. Not installed by default.
pub struct ForwardOnly;

impl TransitionPolicy for ForwardOnly {
    fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Delivered)
        )
    }
}

/// Explicit status-change request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: OrderStatus,
}

/// Asynchronous payment-confirmation event (at-least-once delivery)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceededEvent {
    pub order_id: String,
    pub stripe_payment_id: String,
    pub receipt_url: String,
}

impl PaymentSucceededEvent {
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.order_id, "orderId", MAX_ID_LEN)?;
        validate_required_text(&self.stripe_payment_id, "stripePaymentId", MAX_ID_LEN)?;
        validate_required_text(&self.receipt_url, "receiptUrl", MAX_URL_LEN)?;
        Ok(())
    }
}

impl OrdersService {
    /// Apply an explicit status change.
    ///
    /// Setting the status an order already has is an idempotent
    /// no-op, not an error. Otherwise the transition must pass the
    /// installed policy and is written with a compare-and-set so a
    /// concurrent writer cannot be silently overwritten.
    pub async fn change_status(&self, id: &str, new_status: OrderStatus) -> AppResult<Order> {
        let record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order with id {id} not found")))?;
        let current = record.order.status;

        if current == new_status {
            return Ok(record.order);
        }

        if !self.transitions.allows(current, new_status) {
            return Err(AppError::BusinessRule(format!(
                "Transition {current} -> {new_status} is not allowed"
            )));
        }

        let applied = self
            .repo
            .update_status_checked(id, current, new_status)
            .await?;
        if !applied {
            return Err(AppError::conflict(format!(
                "Order {id} was modified concurrently, status change not applied"
            )));
        }

        info!(order_id = %id, from = %current, to = %new_status, "Order status changed");

        let record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order with id {id} not found")))?;
        Ok(record.order)
    }

    /// Reconcile a payment-confirmed event into the order lifecycle.
    ///
    /// Safe under at-least-once delivery: redelivery of the same
    /// event is a silent no-op; a different charge id for an
    /// already-paid order is a consistency violation and leaves the
    /// recorded charge and receipt untouched. A missing order is a
    /// severe cross-service inconsistency, surfaced as NotFound.
    pub async fn apply_payment_confirmed(&self, event: PaymentSucceededEvent) -> AppResult<Order> {
        event.validate()?;

        let record = self.load_for_payment(&event.order_id).await?;

        if record.order.paid {
            return self.check_recorded_charge(record.order, &event);
        }

        let applied = self
            .repo
            .mark_paid(
                &event.order_id,
                &event.stripe_payment_id,
                &event.receipt_url,
                Utc::now(),
            )
            .await?;

        if applied {
            info!(
                order_id = %event.order_id,
                charge_id = %event.stripe_payment_id,
                "Payment applied, order is PAID"
            );
        }

        let record = self.load_for_payment(&event.order_id).await?;
        if !applied {
            // Lost the paid-flag race to a concurrent delivery;
            // re-check what was recorded
            return self.check_recorded_charge(record.order, &event);
        }
        Ok(record.order)
    }

    async fn load_for_payment(&self, order_id: &str) -> AppResult<crate::db::models::OrderRecord> {
        self.repo.find_by_id(order_id).await?.ok_or_else(|| {
            AppError::not_found(format!(
                "Order with id {order_id} not found, payment event cannot be applied"
            ))
        })
    }

    /// Already-paid path: same charge id is a no-op, a different one
    /// is a consistency error that must be reported, not overwritten.
    fn check_recorded_charge(
        &self,
        order: Order,
        event: &PaymentSucceededEvent,
    ) -> AppResult<Order> {
        if order.payment_charge_id.as_deref() == Some(event.stripe_payment_id.as_str()) {
            debug!(
                order_id = %order.id,
                charge_id = %event.stripe_payment_id,
                "Duplicate payment event ignored"
            );
            Ok(order)
        } else {
            Err(AppError::ConsistencyViolation(format!(
                "Order {} already paid with charge {:?}, event carries charge {}",
                order.id, order.payment_charge_id, event.stripe_payment_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::testing::{service, widget, FakeCatalog, FakePayment};
    use crate::orders::{CreateOrderItem, CreateOrderRequest};
    use std::sync::Arc;

    async fn svc_with_order() -> (super::super::OrdersService, String) {
        let svc = service(
            Arc::new(FakeCatalog::with_products(vec![widget()])),
            Arc::new(FakePayment::ok()),
        )
        .await;
        let response = svc
            .create(CreateOrderRequest {
                items: vec![CreateOrderItem {
                    product_id: "p1".to_string(),
                    price: None,
                    quantity: 2,
                }],
            })
            .await
            .unwrap();
        let id = response.order.id.clone();
        (svc, id)
    }

    fn paid_event(order_id: &str, charge: &str) -> PaymentSucceededEvent {
        PaymentSucceededEvent {
            order_id: order_id.to_string(),
            stripe_payment_id: charge.to_string(),
            receipt_url: format!("https://receipts.example/{charge}"),
        }
    }

    #[tokio::test]
    async fn change_status_is_idempotent() {
        let (svc, id) = svc_with_order().await;

        let first = svc.change_status(&id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(first.status, OrderStatus::Cancelled);

        // Same target again: no-op, same final state
        let second = svc.change_status(&id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(second.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn change_status_unknown_order_is_not_found() {
        let (svc, _) = svc_with_order().await;
        let err = svc
            .change_status("missing", OrderStatus::Cancelled)
            .await
            .unwrap_err();
        match err {
            AppError::NotFound(msg) => assert!(msg.contains("missing")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn forward_only_policy_rejects_backward_edges() {
        let (svc, id) = svc_with_order().await;
        let svc = svc.with_transition_policy(Arc::new(ForwardOnly));

        // PENDING -> DELIVERED is not an edge
        let err = svc
            .change_status(&id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));

        // PENDING -> CANCELLED is
        svc.change_status(&id, OrderStatus::Cancelled).await.unwrap();

        // CANCELLED is terminal
        let err = svc
            .change_status(&id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn payment_event_marks_order_paid_with_one_receipt() {
        let (svc, id) = svc_with_order().await;

        let order = svc
            .apply_payment_confirmed(paid_event(&id, "ch_1"))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert!(order.paid);
        assert_eq!(order.payment_charge_id.as_deref(), Some("ch_1"));
        assert!(order.paid_at.is_some());

        let detail = svc.find_one(&id).await.unwrap();
        let receipt = detail.receipt.expect("receipt created");
        assert_eq!(receipt.receipt_url, "https://receipts.example/ch_1");
    }

    #[tokio::test]
    async fn payment_event_redelivery_is_a_silent_noop() {
        let (svc, id) = svc_with_order().await;

        let first = svc
            .apply_payment_confirmed(paid_event(&id, "ch_1"))
            .await
            .unwrap();
        let second = svc
            .apply_payment_confirmed(paid_event(&id, "ch_1"))
            .await
            .unwrap();

        // paid_at unchanged, still exactly one receipt
        assert_eq!(first.paid_at, second.paid_at);
        let detail = svc.find_one(&id).await.unwrap();
        assert_eq!(
            detail.receipt.unwrap().receipt_url,
            "https://receipts.example/ch_1"
        );
    }

    #[tokio::test]
    async fn conflicting_charge_id_is_a_consistency_violation() {
        let (svc, id) = svc_with_order().await;

        svc.apply_payment_confirmed(paid_event(&id, "ch_1"))
            .await
            .unwrap();
        let err = svc
            .apply_payment_confirmed(paid_event(&id, "ch_2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConsistencyViolation(_)));

        // Original charge and receipt untouched
        let detail = svc.find_one(&id).await.unwrap();
        assert_eq!(detail.payment_charge_id.as_deref(), Some("ch_1"));
        assert_eq!(
            detail.receipt.unwrap().receipt_url,
            "https://receipts.example/ch_1"
        );
    }

    #[tokio::test]
    async fn payment_event_for_missing_order_is_surfaced() {
        let (svc, _) = svc_with_order().await;
        let err = svc
            .apply_payment_confirmed(paid_event("ghost", "ch_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn paid_flip_is_monotonic_through_explicit_changes() {
        let (svc, id) = svc_with_order().await;
        svc.apply_payment_confirmed(paid_event(&id, "ch_1"))
            .await
            .unwrap();

        // Moving the status onward does not disturb payment fields
        let order = svc.change_status(&id, OrderStatus::Delivered).await.unwrap();
        assert!(order.paid);
        assert_eq!(order.payment_charge_id.as_deref(), Some("ch_1"));
        assert_eq!(order.status, OrderStatus::Delivered);
    }
}
