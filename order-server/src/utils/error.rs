//! Unified error handling
//!
//! Provides the application-level error type and the uniform
//! `{status, message}` envelope every failure is translated into
//! before it leaves the service boundary. Raw persistence or
//! transport errors never escape untranslated.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;
use crate::services::ClientError;

/// Application error enum
///
/// | Kind | HTTP status |
/// |------|-------------|
/// | Validation | 400 |
/// | NotFound | 404 |
/// | Conflict | 409 |
/// | ConsistencyViolation | 409 |
/// | BusinessRule | 422 |
/// | UpstreamUnavailable | 503 |
/// | Database / Internal | 500 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input reached the core (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Concurrent modification lost the compare-and-set (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A payment event contradicts previously recorded state (409)
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    /// Status transition rejected by the deployment policy (422)
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Catalog or payment collaborator failed, timed out, or
    /// returned an incomplete result (503)
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Uniform error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::ConsistencyViolation(msg) => {
                // Must be surfaced and alerted, never silently accepted
                error!(target: "consistency", error = %msg, "Consistency violation");
                (StatusCode::CONFLICT, msg.clone())
            }
            AppError::BusinessRule(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::UpstreamUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            status: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Layer conversions ==========

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unavailable(msg) => AppError::UpstreamUnavailable(msg),
            ClientError::InvalidResponse(msg) => {
                AppError::UpstreamUnavailable(format!("Invalid upstream response: {msg}"))
            }
            ClientError::MissingProducts(ids) => {
                AppError::NotFound(format!("Products not found: {}", ids.join(", ")))
            }
        }
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
