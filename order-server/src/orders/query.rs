//! Order queries
//!
//! Single-record and paginated reads. Item names are never persisted
//! locally — every read resolves them live from the catalog.

use super::OrdersService;
use crate::db::models::{Order, OrderDetail, OrderStatus};
use crate::utils::validation::validate_pagination;
use crate::utils::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// Pagination query: 1-indexed page, optional status filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub last_page: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl OrdersService {
    /// Fetch a single order with items and live catalog names.
    pub async fn find_one(&self, id: &str) -> AppResult<OrderDetail> {
        let record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order with id {id} not found")))?;

        let mut product_ids: Vec<String> = record
            .items
            .iter()
            .map(|item| item.product_id.clone())
            .collect();
        product_ids.dedup();

        let products = self.catalog.validate_products(&product_ids).await?;
        let names: HashMap<String, String> = products
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(OrderDetail::hydrate(record, |id| {
            names.get(id).cloned().unwrap_or_default()
        }))
    }

    /// Paginated order headers. `lastPage = ceil(total / limit)`;
    /// a page beyond the last yields empty data with correct meta.
    pub async fn find_all(&self, query: OrderPaginationQuery) -> AppResult<Paginated<Order>> {
        let page = query.page.unwrap_or(DEFAULT_PAGE);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        validate_pagination(page, limit)?;

        let (data, total) = self.repo.find_page(query.status, page, limit).await?;

        Ok(Paginated {
            data,
            meta: PageMeta {
                total,
                page,
                last_page: (total as u64).div_ceil(limit as u64) as i64,
            },
        })
    }
}
