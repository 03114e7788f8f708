//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity
///
/// Email is the identity key within the user directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Merge a partial update into this record
    pub fn apply(&mut self, update: UserUpdate) {
        let UserUpdate {
            name,
            email,
            roll_number,
            phone,
            city,
            avatar,
            department,
            year,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if roll_number.is_some() {
            self.roll_number = roll_number;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if city.is_some() {
            self.city = city;
        }
        if avatar.is_some() {
            self.avatar = avatar;
        }
        if department.is_some() {
            self.department = department;
        }
        if year.is_some() {
            self.year = year;
        }
    }
}

/// Partial profile update payload
///
/// Identity (`id`), `role` and `join_date` are not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
}
