//! End-to-end flow through the service facade: create an order,
//! list it, reconcile a payment event, and move it onward.

use async_trait::async_trait;
use std::sync::Arc;

use order_server::db::models::OrderStatus;
use order_server::db::repository::OrderRepository;
use order_server::db::DbService;
use order_server::orders::{
    CreateOrderItem, CreateOrderRequest, ForwardOnly, OrderPaginationQuery, PaymentSucceededEvent,
};
use order_server::services::{
    CatalogClient, CatalogProduct, ClientResult, PaymentClient, PaymentSession,
    PaymentSessionRequest,
};
use order_server::OrdersService;

struct StaticCatalog(Vec<CatalogProduct>);

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn validate_products(&self, product_ids: &[String]) -> ClientResult<Vec<CatalogProduct>> {
        Ok(self
            .0
            .iter()
            .filter(|p| product_ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

struct StaticGateway;

#[async_trait]
impl PaymentClient for StaticGateway {
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> ClientResult<PaymentSession> {
        Ok(PaymentSession {
            cancel_url: "https://pay.example/cancel".to_string(),
            success_url: "https://pay.example/success".to_string(),
            url: format!("https://pay.example/session/{}", request.order_id),
        })
    }
}

async fn service() -> OrdersService {
    let db = DbService::in_memory().await.expect("in-memory db");
    OrdersService::new(
        OrderRepository::new(db.pool),
        Arc::new(StaticCatalog(vec![
            CatalogProduct {
                id: "p1".to_string(),
                name: "Widget".to_string(),
                price: 5.0,
            },
            CatalogProduct {
                id: "p2".to_string(),
                name: "Gadget".to_string(),
                price: 12.5,
            },
        ])),
        Arc::new(StaticGateway),
        "eur",
    )
    .with_transition_policy(Arc::new(ForwardOnly))
}

#[tokio::test]
async fn full_order_lifecycle() {
    let svc = service().await;

    // Create: catalog prices, computed totals, payment session
    let created = svc
        .create(CreateOrderRequest {
            items: vec![
                CreateOrderItem {
                    product_id: "p1".to_string(),
                    price: None,
                    quantity: 2,
                },
                CreateOrderItem {
                    product_id: "p2".to_string(),
                    price: None,
                    quantity: 1,
                },
            ],
        })
        .await
        .unwrap();

    let order_id = created.order.id.clone();
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.order.total_amount, 22.5);
    assert_eq!(created.order.total_items, 3);
    let session = created.payment_session.expect("session created");
    assert!(session.url.contains(&order_id));

    // Query: listed and hydrated with live names
    let page = svc.find_all(OrderPaginationQuery::default()).await.unwrap();
    assert_eq!(page.meta.total, 1);

    let detail = svc.find_one(&order_id).await.unwrap();
    let names: Vec<&str> = detail.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Widget", "Gadget"]);

    // Reconcile the payment event; second delivery is a no-op
    let event = PaymentSucceededEvent {
        order_id: order_id.clone(),
        stripe_payment_id: "ch_42".to_string(),
        receipt_url: "https://receipts.example/42".to_string(),
    };
    let paid = svc.apply_payment_confirmed(event.clone()).await.unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    svc.apply_payment_confirmed(event).await.unwrap();

    let detail = svc.find_one(&order_id).await.unwrap();
    assert!(detail.paid);
    assert_eq!(detail.receipt.unwrap().receipt_url, "https://receipts.example/42");

    // Forward-only graph: PAID -> DELIVERED allowed, terminal after
    let delivered = svc
        .change_status(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(svc
        .change_status(&order_id, OrderStatus::Pending)
        .await
        .is_err());
}
