//! Checkout and profile form validation
//!
//! Validators never fail; they return a [`FieldErrors`] map keyed by the
//! form field name so every problem can be shown at once.

use regex::Regex;
use shared::FieldErrors;
use shared::models::{CheckoutDetails, UserUpdate};
use std::sync::LazyLock;

/// `local@domain.tld` with no whitespace
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Indian mobile number
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("phone pattern"));

pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address";
pub const MSG_INVALID_PHONE: &str = "Invalid 10-digit phone number";
pub const MSG_COLLEGE_ID_REQUIRED: &str = "College ID is required";
pub const MSG_ADDRESS_REQUIRED: &str = "Please select a delivery address";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Keep digits only, at most 10 of them (phone input box behaviour)
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).take(10).collect()
}

/// Step 1 of the booking flow
pub fn validate_details(details: &CheckoutDetails) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if details.full_name.is_empty() {
        errors.insert("fullName", MSG_NAME_REQUIRED);
    }
    if !is_valid_email(&details.email) {
        errors.insert("email", MSG_INVALID_EMAIL);
    }
    if !is_valid_phone(&details.phone) {
        errors.insert("phone", MSG_INVALID_PHONE);
    }
    if details.college_id.is_empty() {
        errors.insert("collegeId", MSG_COLLEGE_ID_REQUIRED);
    }
    if details.address.is_empty() {
        errors.insert("address", MSG_ADDRESS_REQUIRED);
    }
    errors
}

/// Profile edit form. Phone and email are optional but must be well
/// formed when present; a name, if given, must not be blank.
pub fn validate_profile(update: &UserUpdate) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(name) = &update.name
        && name.trim().is_empty()
    {
        errors.insert("name", MSG_NAME_REQUIRED);
    }
    if let Some(phone) = update.phone.as_deref().filter(|p| !p.is_empty())
        && !is_valid_phone(phone)
    {
        errors.insert("phone", MSG_INVALID_PHONE);
    }
    if let Some(email) = update.email.as_deref().filter(|e| !e.is_empty())
        && !is_valid_email(email)
    {
        errors.insert("email", MSG_INVALID_EMAIL);
    }
    errors
}
