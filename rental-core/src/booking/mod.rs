//! Booking workflow: checkout wizard, form validation, address entry and
//! the final receipt.

pub mod address;
pub mod flow;
pub mod receipt;
pub mod validation;

pub use address::{AddressForm, AddressKind};
pub use flow::{BookingFlow, BookingStep, PaymentMethod};
pub use receipt::{Receipt, ReceiptConfig};
