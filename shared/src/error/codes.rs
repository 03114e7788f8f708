//! Unified error codes for the rental portal
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Session / authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Hardware catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they survive JSON
/// round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 1xxx: Session ====================
    /// No active session
    NotAuthenticated = 1001,
    /// Invalid credentials (admin password)
    InvalidCredentials = 1002,
    /// Email already belongs to another user
    EmailInUse = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Order ====================
    /// Order has no items
    EmptyOrder = 4002,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4003,
    /// Pending order was cancelled before it was committed
    OrderCancelled = 4004,
    /// Payment method is not enabled
    PaymentMethodUnavailable = 4005,
    /// Booking step does not accept this action
    InvalidBookingStep = 4006,

    // ==================== 6xxx: Hardware ====================
    /// Hardware item is not available for rent
    HardwareUnavailable = 6002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Persistent store error
    StorageError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",

            // Session
            ErrorCode::NotAuthenticated => "Please login first",
            ErrorCode::InvalidCredentials => "Invalid admin password",
            ErrorCode::EmailInUse => "Email is already registered to another user",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Order
            ErrorCode::EmptyOrder => "No items to checkout",
            ErrorCode::InvalidStatusTransition => "Order status change is not allowed",
            ErrorCode::OrderCancelled => "Order was cancelled before it was placed",
            ErrorCode::PaymentMethodUnavailable => "Payment method is not available",
            ErrorCode::InvalidBookingStep => "Action not available at this booking step",

            // Hardware
            ErrorCode::HardwareUnavailable => "Hardware item is not available for rent",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Persistent store error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            // Session
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::EmailInUse),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Order
            4002 => Ok(ErrorCode::EmptyOrder),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::OrderCancelled),
            4005 => Ok(ErrorCode::PaymentMethodUnavailable),
            4006 => Ok(ErrorCode::InvalidBookingStep),

            // Hardware
            6002 => Ok(ErrorCode::HardwareUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4003);
        assert_eq!(ErrorCode::HardwareUnavailable.code(), 6002);
        assert_eq!(ErrorCode::StorageError.code(), 9002);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::EmptyOrder).unwrap();
        assert_eq!(json, "4002");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::InvalidStatusTransition);

        let code: ErrorCode = serde_json::from_str("9002").unwrap();
        assert_eq!(code, ErrorCode::StorageError);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_every_code_roundtrips_through_u16() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::EmailInUse,
            ErrorCode::PermissionDenied,
            ErrorCode::EmptyOrder,
            ErrorCode::InvalidStatusTransition,
            ErrorCode::OrderCancelled,
            ErrorCode::PaymentMethodUnavailable,
            ErrorCode::InvalidBookingStep,
            ErrorCode::HardwareUnavailable,
            ErrorCode::InternalError,
            ErrorCode::StorageError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::EmptyOrder.message(), "No items to checkout");
        assert_eq!(ErrorCode::NotAuthenticated.message(), "Please login first");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
