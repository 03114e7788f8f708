//! Data models
//!
//! Shared between the state container, the booking workflow, and the
//! persisted JSON snapshots. Field names serialize in camelCase so stored
//! snapshots keep the portal's existing layout.

pub mod hardware;
pub mod order;
pub mod post;
pub mod problem_statement;
pub mod user;

// Re-exports
pub use hardware::*;
pub use order::*;
pub use post::*;
pub use problem_statement::*;
pub use user::*;
