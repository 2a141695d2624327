//! Orders core
//!
//! The order-creation saga, queries, and the status-reconciliation
//! state machine. Handlers stay thin; everything with ordering,
//! consistency, or failure-handling concerns lives here.

mod create;
mod query;
mod status;

pub use create::{CreateOrderItem, CreateOrderRequest, CreateOrderResponse};
pub use query::{OrderPaginationQuery, PageMeta, Paginated};
pub use status::{
    AllowAll, ChangeStatusRequest, ForwardOnly, PaymentSucceededEvent, TransitionPolicy,
};

use crate::db::repository::OrderRepository;
use crate::services::{CatalogClient, PaymentClient};
use std::sync::Arc;

/// Order service facade
///
/// Remote collaborators are constructor-supplied trait objects so the
/// saga is testable with fakes.
#[derive(Clone)]
pub struct OrdersService {
    repo: OrderRepository,
    catalog: Arc<dyn CatalogClient>,
    payment: Arc<dyn PaymentClient>,
    transitions: Arc<dyn TransitionPolicy>,
    currency: String,
}

impl OrdersService {
    pub fn new(
        repo: OrderRepository,
        catalog: Arc<dyn CatalogClient>,
        payment: Arc<dyn PaymentClient>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            catalog,
            payment,
            transitions: Arc::new(AllowAll),
            currency: currency.into(),
        }
    }

    /// Install a deployment-specific transition policy.
    /// The default policy allows every transition.
    pub fn with_transition_policy(mut self, policy: Arc<dyn TransitionPolicy>) -> Self {
        self.transitions = policy;
        self
    }
}

#[cfg(test)]
impl OrdersService {
    /// Swap the payment collaborator (gateway-recovery tests)
    pub(crate) fn swap_payment(mut self, payment: Arc<dyn PaymentClient>) -> Self {
        self.payment = payment;
        self
    }

    /// Swap the catalog collaborator (outage tests)
    pub(crate) fn swap_catalog(mut self, catalog: Arc<dyn CatalogClient>) -> Self {
        self.catalog = catalog;
        self
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fake collaborators for saga and state-machine tests.

    use crate::db::repository::OrderRepository;
    use crate::db::DbService;
    use crate::services::{
        CatalogClient, CatalogProduct, ClientError, ClientResult, PaymentClient, PaymentSession,
        PaymentSessionRequest,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::OrdersService;

    /// In-memory catalog fake
    pub struct FakeCatalog {
        pub products: Vec<CatalogProduct>,
        pub unavailable: bool,
    }

    impl FakeCatalog {
        pub fn with_products(products: Vec<CatalogProduct>) -> Self {
            Self {
                products,
                unavailable: false,
            }
        }

        pub fn unavailable() -> Self {
            Self {
                products: Vec::new(),
                unavailable: true,
            }
        }
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        async fn validate_products(
            &self,
            product_ids: &[String],
        ) -> ClientResult<Vec<CatalogProduct>> {
            if self.unavailable {
                return Err(ClientError::Unavailable("catalog down".to_string()));
            }
            let resolved: Vec<CatalogProduct> = self
                .products
                .iter()
                .filter(|p| product_ids.contains(&p.id))
                .cloned()
                .collect();
            let missing: Vec<String> = product_ids
                .iter()
                .filter(|id| !resolved.iter().any(|p| &p.id == *id))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(ClientError::MissingProducts(missing));
            }
            Ok(resolved)
        }
    }

    /// Payment gateway fake that records every session request
    pub struct FakePayment {
        pub fail: bool,
        pub requests: Mutex<Vec<PaymentSessionRequest>>,
    }

    impl FakePayment {
        pub fn ok() -> Self {
            Self {
                fail: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentClient for FakePayment {
        async fn create_session(
            &self,
            request: &PaymentSessionRequest,
        ) -> ClientResult<PaymentSession> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ClientError::Unavailable("gateway down".to_string()));
            }
            Ok(PaymentSession {
                cancel_url: "https://pay.example/cancel".to_string(),
                success_url: "https://pay.example/success".to_string(),
                url: format!("https://pay.example/session/{}", request.order_id),
            })
        }
    }

    pub fn widget() -> CatalogProduct {
        CatalogProduct {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            price: 5.0,
        }
    }

    /// Service wired against an in-memory store and the given fakes
    pub async fn service(
        catalog: Arc<dyn CatalogClient>,
        payment: Arc<dyn PaymentClient>,
    ) -> OrdersService {
        let db = DbService::in_memory().await.expect("in-memory db");
        OrdersService::new(OrderRepository::new(db.pool), catalog, payment, "eur")
    }
}
