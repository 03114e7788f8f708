//! Shared types for the campus hardware-rental portal
//!
//! Domain entities, error types, response envelope, and time/id helpers
//! used by the state container and the booking workflow.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, FieldErrors};
pub use serde::{Deserialize, Serialize};
