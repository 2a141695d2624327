//! Payment gateway client
//!
//! Creates a payment session for an order's line items. Session
//! creation is idempotent-retryable per order id on the gateway
//! side, so a transient failure here never rolls back the order.

use super::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Line item sent to the payment gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSessionItem {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Session-creation request: order id, fixed settlement currency,
/// and the persisted line items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    pub order_id: String,
    pub currency: String,
    pub items: Vec<PaymentSessionItem>,
}

/// Opaque session descriptor returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub cancel_url: String,
    pub success_url: String,
    pub url: String,
}

/// Payment collaborator seam
#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn create_session(&self, request: &PaymentSessionRequest)
        -> ClientResult<PaymentSession>;
}

/// HTTP implementation talking to the payment gateway
#[derive(Debug, Clone)]
pub struct HttpPaymentClient {
    client: Client,
    base_url: String,
}

impl HttpPaymentClient {
    /// Create a payment client with a bounded request timeout
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
impl PaymentClient for HttpPaymentClient {
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> ClientResult<PaymentSession> {
        let url = format!(
            "{}/api/payments/session",
            self.base_url.trim_end_matches('/')
        );

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Unavailable(format!(
                "Payment gateway returned {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}
