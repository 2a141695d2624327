//! Server configuration
//!
//! Every setting can be overridden through environment variables:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | HTTP_PORT | 3002 | HTTP API port |
//! | DATABASE_PATH | orders.db | SQLite database file |
//! | CATALOG_SERVICE_URL | http://localhost:3001 | Product catalog collaborator |
//! | PAYMENT_SERVICE_URL | http://localhost:3003 | Payment gateway collaborator |
//! | RPC_TIMEOUT_MS | 5000 | Outbound RPC timeout |
//! | SETTLEMENT_CURRENCY | eur | Fixed settlement currency |
//! | LOG_LEVEL | info | Log filter level |
//! | LOG_DIR | (stdout) | Daily-rolling log directory |
//! | ENVIRONMENT | development | development \| staging \| production |

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API service port
    pub http_port: u16,
    /// SQLite database path
    pub database_path: String,
    /// Product catalog service base URL
    pub catalog_service_url: String,
    /// Payment gateway service base URL
    pub payment_service_url: String,
    /// Timeout for outbound RPC calls (milliseconds)
    pub rpc_timeout_ms: u64,
    /// Fixed settlement currency for payment sessions
    pub settlement_currency: String,
    /// Log filter level
    pub log_level: String,
    /// Optional log directory for daily-rolling files
    pub log_dir: Option<String>,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables,
    /// falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "orders.db".into()),
            catalog_service_url: std::env::var("CATALOG_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            payment_service_url: std::env::var("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3003".into()),
            rpc_timeout_ms: std::env::var("RPC_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            settlement_currency: std::env::var("SETTLEMENT_CURRENCY")
                .unwrap_or_else(|_| "eur".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Outbound RPC timeout as a Duration
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
