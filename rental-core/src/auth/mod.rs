//! Session authorization

pub mod permissions;

pub use permissions::{require_permission, role_has_permission};
