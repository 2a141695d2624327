//! Shared utilities: error envelope, logging, validation, money math.

pub mod error;
pub mod logger;
pub mod money;
pub mod validation;

pub use error::{AppError, AppResult};
