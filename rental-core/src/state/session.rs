//! Session: login, logout, profile updates

use super::PortalState;
use crate::auth::permissions::{self, require_permission};
use crate::booking::validation::validate_profile;
use crate::security_log;
use crate::storage::Namespace;
use shared::models::{User, UserRole, UserUpdate};
use shared::util::today;
use shared::{AppError, AppResult, ErrorCode};

pub const ADMIN_EMAIL: &str = "admin@sona.edu";
pub const ADMIN_NAME: &str = "Club Admin";
/// City given to users created on first login
pub const DEFAULT_CITY: &str = "Salem";

impl PortalState {
    /// Resolve `email` in the directory and make it the active session.
    ///
    /// A known email always activates the stored record; `name` and `role`
    /// only matter when a new user is created. New users never start as
    /// admins here, that role comes from [`Self::admin_login`] only.
    pub fn login(&self, email: &str, name: &str, role: UserRole) -> User {
        if role == UserRole::Admin {
            security_log!(WARN, "admin_role_requested", email = %email);
        }
        self.activate(email, name, UserRole::User)
    }

    fn activate(&self, email: &str, name: &str, role: UserRole) -> User {
        let user = {
            let mut users = self.inner.users.write();
            match users.iter().find(|u| u.email == email) {
                Some(existing) => {
                    tracing::info!(user_id = %existing.id, "User logged in");
                    existing.clone()
                }
                None => {
                    let created = User {
                        id: uuid::Uuid::new_v4().to_string(),
                        name: name.to_string(),
                        email: email.to_string(),
                        role,
                        roll_number: Some(String::new()),
                        phone: Some(String::new()),
                        city: Some(DEFAULT_CITY.to_string()),
                        join_date: Some(today()),
                        avatar: Some(String::new()),
                        department: Some(String::new()),
                        year: Some(String::new()),
                    };
                    users.push(created.clone());
                    tracing::info!(user_id = %created.id, role = %role, "New user registered on login");
                    created
                }
            }
        };

        let mut session = self.inner.session.write();
        *session = Some(user.clone());
        self.inner.persistence.save(Namespace::User, &user);
        user
    }

    /// Log in as the club administrator
    pub fn admin_login(&self, password: &str) -> AppResult<User> {
        if password != self.inner.options.admin_password {
            security_log!(WARN, "admin_login_failed", reason = "invalid_password");
            return Err(AppError::invalid_credentials());
        }

        let user = self.activate(ADMIN_EMAIL, ADMIN_NAME, UserRole::Admin);
        if !user.is_admin() {
            // Directory entry for the admin email lost its role
            security_log!(ERROR, "admin_login_failed", reason = "role_mismatch", user_id = %user.id);
            self.logout();
            return Err(AppError::permission_denied("Admin account is not an administrator"));
        }

        security_log!(INFO, "admin_login", user_id = %user.id);
        Ok(user)
    }

    /// Clear the session, the cart, and session likes
    pub fn logout(&self) {
        let previous = self.inner.session.write().take();
        self.inner.persistence.clear(Namespace::User);

        {
            let mut cart = self.inner.cart.write();
            cart.clear();
            self.inner.persistence.save(Namespace::Cart, &*cart);
        }
        self.inner.liked_posts.write().clear();

        match previous {
            Some(user) => tracing::info!(user_id = %user.id, "User logged out"),
            None => tracing::debug!("Logout without an active session"),
        }
    }

    /// Merge `update` into the active user and its directory entry.
    ///
    /// `Ok(None)` without a session. A malformed phone or email, a blank
    /// name, or an email owned by another user is refused.
    pub fn update_user_profile(&self, update: UserUpdate) -> AppResult<Option<User>> {
        let errors = validate_profile(&update);
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "Profile update rejected by validation");
            errors.into_result()?;
        }

        let mut session = self.inner.session.write();
        let Some(current) = session.as_mut() else {
            tracing::debug!("Profile update without an active session ignored");
            return Ok(None);
        };

        let mut users = self.inner.users.write();
        if let Some(email) = &update.email
            && users.iter().any(|u| u.email == *email && u.id != current.id)
        {
            tracing::warn!(user_id = %current.id, "Profile update rejected: email in use");
            return Err(AppError::new(ErrorCode::EmailInUse).with_detail("email", email.as_str()));
        }

        current.apply(update);
        match users.iter_mut().find(|u| u.id == current.id) {
            Some(entry) => *entry = current.clone(),
            None => users.push(current.clone()),
        }

        self.inner.persistence.save(Namespace::User, &*current);
        tracing::info!(user_id = %current.id, "Profile updated");
        Ok(Some(current.clone()))
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.session.read().clone()
    }

    /// Student directory (admin view)
    pub fn all_users(&self) -> AppResult<Vec<User>> {
        self.require(permissions::USERS_VIEW)?;
        Ok(self.inner.users.read().clone())
    }

    /// Check the active session against a permission, returning that user
    pub(crate) fn require(&self, permission: &str) -> AppResult<User> {
        let session = self.inner.session.read();
        match require_permission(session.as_ref(), permission) {
            Ok(user) => Ok(user.clone()),
            Err(e) => {
                tracing::warn!(permission, code = %e.code, "Operation refused");
                Err(e)
            }
        }
    }
}
