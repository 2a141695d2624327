//! Shared server state
//!
//! Wires the repository and the collaborator clients into the
//! orders service; cloned into every handler.

use crate::core::Config;
use crate::db::repository::OrderRepository;
use crate::db::DbService;
use crate::orders::OrdersService;
use crate::services::{HttpCatalogClient, HttpPaymentClient};
use crate::utils::{AppError, AppResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub orders: OrdersService,
}

impl ServerState {
    /// Initialize state: open the database, run migrations, build
    /// the HTTP collaborator clients with the configured timeout.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;

        let catalog = HttpCatalogClient::new(&config.catalog_service_url, config.rpc_timeout())
            .map_err(|e| AppError::internal(format!("Failed to build catalog client: {e}")))?;
        let payment = HttpPaymentClient::new(&config.payment_service_url, config.rpc_timeout())
            .map_err(|e| AppError::internal(format!("Failed to build payment client: {e}")))?;

        let orders = OrdersService::new(
            OrderRepository::new(db.pool.clone()),
            Arc::new(catalog),
            Arc::new(payment),
            config.settlement_currency.clone(),
        );

        Ok(Self {
            config: config.clone(),
            orders,
        })
    }
}
