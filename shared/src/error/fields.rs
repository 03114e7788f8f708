//! Field-level validation errors

use super::codes::ErrorCode;
use super::types::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name → message map produced by form validators.
///
/// Validators return this instead of failing, so a form can surface one
/// message per invalid field at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, replacing any earlier one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set of errors into this one
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when empty, otherwise a `ValidationFailed` error carrying
    /// every field as a detail entry.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            return Ok(());
        }
        let mut err = AppError::with_message(
            ErrorCode::ValidationFailed,
            format!("{} field(s) failed validation", self.len()),
        );
        for (field, message) in self.0 {
            err = err.with_detail(field, message);
        }
        Err(err)
    }
}
