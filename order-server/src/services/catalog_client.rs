//! Product catalog client
//!
//! The catalog is the sole authority for current product names and
//! prices. Nothing is cached here: every read goes live, trading
//! latency for freshness.

use super::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Authoritative product data returned by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Catalog collaborator seam. The orchestrator and query service
/// depend on this trait so tests can substitute fakes.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Validate a set of product ids and return authoritative
    /// `{id, name, price}` for each. The result covers every
    /// requested id or the call fails — partial resolution is
    /// never returned.
    async fn validate_products(&self, product_ids: &[String]) -> ClientResult<Vec<CatalogProduct>>;
}

/// HTTP implementation talking to the catalog service
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a catalog client with a bounded request timeout.
    /// A timeout surfaces as `ClientError::Unavailable`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Unavailable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn validate_products(&self, product_ids: &[String]) -> ClientResult<Vec<CatalogProduct>> {
        let url = format!(
            "{}/api/products/validate",
            self.base_url.trim_end_matches('/')
        );

        let response = self.client.post(&url).json(&product_ids).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Unavailable(format!(
                "Catalog returned {status}: {text}"
            )));
        }

        let products: Vec<CatalogProduct> = response.json().await?;

        // The contract requires full coverage of the requested set
        let resolved: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        let missing: Vec<String> = product_ids
            .iter()
            .filter(|id| !resolved.contains(id.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ClientError::MissingProducts(missing));
        }

        Ok(products)
    }
}
