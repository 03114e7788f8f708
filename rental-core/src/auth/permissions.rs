//! Permission Definitions
//!
//! Role-based permission table for the portal's mutating operations.
//!
//! ## 设计原则
//! - 浏览目录、购物车、下单、社区发帖无需权限，登录即可使用
//! - 管理操作按模块授权（库存、订单、问题陈述）
//! - admin 角色持有超级权限 `all`
//! - admin 角色只能通过 `admin_login`（密码）获得；普通 `login` 新建的用户一律是 USER

use shared::models::{User, UserRole};
use shared::{AppError, AppResult};

/// Inventory create/update/delete
pub const HARDWARE_MANAGE: &str = "hardware:manage";
/// Order status changes
pub const ORDERS_MANAGE: &str = "orders:manage";
/// Problem statement create/update/delete
pub const PROBLEMS_MANAGE: &str = "problems:manage";
/// Read the user directory and per-user history
pub const USERS_VIEW: &str = "users:view";
/// 超级权限
pub const ALL: &str = "all";

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[HARDWARE_MANAGE, ORDERS_MANAGE, PROBLEMS_MANAGE, USERS_VIEW];

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &[ALL];

/// 学生默认无管理权限
pub const DEFAULT_USER_PERMISSIONS: &[&str] = &[];

/// Get permissions for a role
pub fn get_default_permissions(role: UserRole) -> &'static [&'static str] {
    match role {
        UserRole::Admin => DEFAULT_ADMIN_PERMISSIONS,
        UserRole::User => DEFAULT_USER_PERMISSIONS,
    }
}

/// Whether a role holds a permission (`all` grants everything)
pub fn role_has_permission(role: UserRole, permission: &str) -> bool {
    get_default_permissions(role)
        .iter()
        .any(|p| *p == ALL || *p == permission)
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    permission == ALL || ALL_PERMISSIONS.contains(&permission)
}

/// Check the session user against a permission
///
/// Returns the user on success so callers can attribute the change.
pub fn require_permission<'a>(user: Option<&'a User>, permission: &str) -> AppResult<&'a User> {
    let Some(user) = user else {
        return Err(AppError::not_authenticated().with_detail("permission", permission));
    };

    if role_has_permission(user.role, permission) {
        Ok(user)
    } else {
        Err(
            AppError::permission_denied(format!("Permission '{}' is required", permission))
                .with_detail("permission", permission)
                .with_detail("user_id", user.id.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    fn user(role: UserRole) -> User {
        User {
            id: "u1".into(),
            name: "Rahul Kumar".into(),
            email: "rahul@sona.edu".into(),
            role,
            roll_number: None,
            phone: None,
            city: None,
            join_date: None,
            avatar: None,
            department: None,
            year: None,
        }
    }

    #[test]
    fn test_admin_holds_everything() {
        for perm in ALL_PERMISSIONS {
            assert!(role_has_permission(UserRole::Admin, perm));
        }
    }

    #[test]
    fn test_student_holds_nothing() {
        for perm in ALL_PERMISSIONS {
            assert!(!role_has_permission(UserRole::User, perm));
        }
    }

    #[test]
    fn test_require_permission_without_session() {
        let err = require_permission(None, HARDWARE_MANAGE).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_require_permission_denied_for_student() {
        let student = user(UserRole::User);
        let err = require_permission(Some(&student), ORDERS_MANAGE).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_require_permission_allows_admin() {
        let admin = user(UserRole::Admin);
        assert!(require_permission(Some(&admin), PROBLEMS_MANAGE).is_ok());
    }

    #[test]
    fn test_permission_names() {
        assert!(is_valid_permission("hardware:manage"));
        assert!(is_valid_permission("all"));
        assert!(!is_valid_permission("menu:manage"));
    }
}
