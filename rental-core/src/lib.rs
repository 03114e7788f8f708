//! Rental Core - 校园硬件租借门户核心
//!
//! # 架构概述
//!
//! - **状态容器** (`state`): 用户、目录、购物车、订单、社区、问题陈述
//! - **持久化** (`storage`): redb 键值存储，按命名空间保存快照
//! - **权限** (`auth`): 基于角色的权限检查
//! - **预订流程** (`booking`): 四步结账向导、表单校验、地址、收据
//!
//! # 模块结构
//!
//! ```text
//! rental-core/src/
//! ├── auth/       # 权限表
//! ├── booking/    # 结账向导
//! ├── state/      # PortalState
//! ├── utils/      # 日志
//! ├── config.rs   # 环境变量配置
//! ├── seed.rs     # 初始数据
//! └── storage.rs  # redb 存储适配
//! ```

pub mod auth;
pub mod booking;
pub mod config;
pub mod seed;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use booking::{BookingFlow, BookingStep, Receipt, ReceiptConfig};
pub use config::Config;
pub use state::{PendingOrder, PortalState, StateOptions};
pub use storage::{KeyValueStore, Namespace, Persistence, RedbStore};

// Re-export unified error types from shared
pub use shared::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Audit log - 记录管理员对目录、订单、问题陈述的修改
///
/// Audit events go to `logs/audit/` and are never cleaned up.
///
/// ```ignore
/// audit_log!(admin.id.as_str(), "delete", format!("hardware:{}", id));
/// audit_log!(admin.id.as_str(), "update_status", format!("order:{}", id), "PENDING -> APPROVED");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($user_id:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user_id = $user_id,
            action = $action,
            resource = %$resource,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($user_id:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            user_id = $user_id,
            action = $action,
            resource = %$resource,
            details = %$details,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

/// Security log - 登录等安全相关事件
///
/// ```ignore
/// security_log!(WARN, "admin_login_failed", reason = "invalid_password");
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
}
