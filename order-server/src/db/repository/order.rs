//! Order Repository
//!
//! CRUD and pagination for the order aggregate. The aggregate
//! (header + items + receipt) is the unit of consistency: fields
//! that must change together are written in one transaction, and
//! same-order races are resolved with conditional updates.

use super::RepoResult;
use crate::db::models::{NewOrder, Order, OrderItem, OrderRecord, OrderStatus, Receipt};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new PENDING order with all its items atomically.
    /// Either the header and every item row commit, or nothing does.
    pub async fn create(&self, new: NewOrder) -> RepoResult<OrderRecord> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, status, total_amount, total_items, paid, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&new.id)
        .bind(OrderStatus::Pending)
        .bind(new.total_amount)
        .bind(new.total_items)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, price, quantity)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&new.id)
            .bind(&item.product_id)
            .bind(item.price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderRecord {
            order: Order {
                id: new.id,
                status: OrderStatus::Pending,
                total_amount: new.total_amount,
                total_items: new.total_items,
                paid: false,
                paid_at: None,
                payment_charge_id: None,
                created_at: now,
                updated_at: now,
            },
            items: new
                .items
                .into_iter()
                .map(|item| OrderItem {
                    product_id: item.product_id,
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            receipt: None,
        })
    }

    /// Load the full aggregate: header, items, optional receipt.
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrderRecord>> {
        let order: Option<Order> = sqlx::query_as(
            "SELECT id, status, total_amount, total_items, paid, paid_at,
                    payment_charge_id, created_at, updated_at
             FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items: Vec<OrderItem> = sqlx::query_as(
            "SELECT product_id, price, quantity FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let receipt: Option<Receipt> =
            sqlx::query_as("SELECT receipt_url FROM order_receipts WHERE order_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(Some(OrderRecord {
            order,
            items,
            receipt,
        }))
    }

    /// Paginated headers with an optional status filter.
    /// Returns the page rows and the total count under the same filter.
    pub async fn find_page(
        &self,
        status: Option<OrderStatus>,
        page: i64,
        limit: i64,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let offset = (page - 1) * limit;

        let (total, orders) = match status {
            Some(status) => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?;
                let orders: Vec<Order> = sqlx::query_as(
                    "SELECT id, status, total_amount, total_items, paid, paid_at,
                            payment_charge_id, created_at, updated_at
                     FROM orders WHERE status = ?
                     ORDER BY created_at, id LIMIT ? OFFSET ?",
                )
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (total, orders)
            }
            None => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
                    .fetch_one(&self.pool)
                    .await?;
                let orders: Vec<Order> = sqlx::query_as(
                    "SELECT id, status, total_amount, total_items, paid, paid_at,
                            payment_charge_id, created_at, updated_at
                     FROM orders ORDER BY created_at, id LIMIT ? OFFSET ?",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (total, orders)
            }
        };

        Ok((orders, total))
    }

    /// Compare-and-set status update: applies only if the row still
    /// holds `expected_from`. Returns whether the update applied.
    pub async fn update_status_checked(
        &self,
        id: &str,
        expected_from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to)
        .bind(Utc::now())
        .bind(id)
        .bind(expected_from)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Apply payment in one transaction: flip status/paid/paid_at/
    /// payment_charge_id and insert the receipt, guarded by `paid = 0`
    /// so at-least-once delivery can never pay an order twice.
    /// Returns whether the payment applied (false ⇒ already paid).
    pub async fn mark_paid(
        &self,
        id: &str,
        charge_id: &str,
        receipt_url: &str,
        paid_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE orders
             SET status = ?, paid = 1, paid_at = ?, payment_charge_id = ?, updated_at = ?
             WHERE id = ? AND paid = 0",
        )
        .bind(OrderStatus::Paid)
        .bind(paid_at)
        .bind(charge_id)
        .bind(paid_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let applied = result.rows_affected() == 1;
        if applied {
            sqlx::query(
                "INSERT INTO order_receipts (order_id, receipt_url, created_at) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(receipt_url)
            .bind(paid_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(applied)
    }
}
