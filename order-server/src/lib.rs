//! Order server
//!
//! Order-management service: validates requested items against the
//! product catalog, prices and persists orders atomically, initiates
//! payment sessions, and reconciles asynchronous payment-confirmed
//! events into the order lifecycle.

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use orders::OrdersService;
pub use utils::{AppError, AppResult};
