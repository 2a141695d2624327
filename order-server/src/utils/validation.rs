//! Input validation helpers
//!
//! Boundary-layer checks applied before a request reaches the core.
//! Values that violate the contract are rejected, never clamped.

use crate::utils::money::{MAX_PRICE, MAX_QUANTITY};
use crate::utils::AppError;

/// Product / charge identifiers and URLs
pub const MAX_ID_LEN: usize = 100;
pub const MAX_URL_LEN: usize = 2048;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate an item quantity: positive and within bounds.
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

/// Validate a price: finite, non-negative, within bounds.
pub fn validate_price(price: f64, field: &str) -> Result<(), AppError> {
    if !price.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {price}"
        )));
    }
    if price < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Validate pagination parameters: 1-indexed page, positive limit.
/// Out-of-range values are a contract violation, not clamped.
pub fn validate_pagination(page: i64, limit: i64) -> Result<(), AppError> {
    if page <= 0 {
        return Err(AppError::validation(format!(
            "page must be a positive integer, got {page}"
        )));
    }
    if limit <= 0 {
        return Err(AppError::validation(format!(
            "limit must be a positive integer, got {limit}"
        )));
    }
    Ok(())
}
