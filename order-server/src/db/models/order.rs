//! Order Model
//!
//! The Order aggregate: header, item rows and optional receipt.
//! Wire shapes use camelCase to match the platform contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Order status
// =============================================================================

/// Order lifecycle status
///
/// `PENDING` is the only valid creation state; `PAID` is reached only
/// through the payment-confirmed event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!(
                "Invalid status '{other}', valid values are PENDING, PAID, DELIVERED, CANCELLED"
            )),
        }
    }
}

// =============================================================================
// Order (header row)
// =============================================================================

/// Order header entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    /// Σ items price × quantity, computed once at creation
    pub total_amount: f64,
    /// Σ items quantity
    pub total_items: i64,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_charge_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted order item (price snapshotted from the catalog at
/// creation time; authoritative thereafter)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub price: f64,
    pub quantity: i64,
}

/// Receipt created alongside payment application
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub receipt_url: String,
}

/// Full persisted aggregate as loaded from the store
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub receipt: Option<Receipt>,
}

// =============================================================================
// Create payloads (repository input)
// =============================================================================

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: String,
    pub total_amount: f64,
    pub total_items: i64,
    pub items: Vec<NewOrderItem>,
}

// =============================================================================
// Hydrated shapes (API responses)
// =============================================================================

/// Order item annotated with the catalog-resolved name.
/// Names are never persisted; they are resolved live on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Full hydrated order for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub total_items: i64,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_charge_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
}

impl OrderDetail {
    /// Build a hydrated detail from a persisted record and a
    /// `product_id -> name` resolver.
    pub fn hydrate(record: OrderRecord, mut name_of: impl FnMut(&str) -> String) -> Self {
        let OrderRecord {
            order,
            items,
            receipt,
        } = record;
        Self {
            id: order.id,
            status: order.status,
            total_amount: order.total_amount,
            total_items: order.total_items,
            paid: order.paid,
            paid_at: order.paid_at,
            payment_charge_id: order.payment_charge_id,
            created_at: order.created_at,
            items: items
                .into_iter()
                .map(|item| OrderItemDetail {
                    name: name_of(&item.product_id),
                    product_id: item.product_id,
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            receipt,
        }
    }
}
