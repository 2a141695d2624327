//! Outbound RPC adapters for the catalog and payment collaborators.

pub mod catalog_client;
pub mod payment_client;

pub use catalog_client::{CatalogClient, CatalogProduct, HttpCatalogClient};
pub use payment_client::{
    HttpPaymentClient, PaymentClient, PaymentSession, PaymentSessionItem, PaymentSessionRequest,
};

use thiserror::Error;

/// Collaborator client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or timeout — never treated as success or
    /// failure of the business operation, always surfaced
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// Response did not match the typed contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Catalog response did not cover every requested product id
    #[error("Products not found: {}", .0.join(", "))]
    MissingProducts(Vec<String>),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Unavailable(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
