use std::path::PathBuf;
use std::time::Duration;

/// 门户配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、日志) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志输出 |
/// | ORDER_LATENCY_MS | 1500 | 下单模拟延迟(毫秒) |
/// | PORTAL_ORIGIN | http://localhost:3000 | 回执链接的基础 URL |
/// | QR_ENDPOINT | https://api.qrserver.com/v1/create-qr-code/ | 二维码渲染服务 |
/// | ADMIN_PASSWORD | AJ2006 | 管理员登录密码 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/tmp/portal ORDER_LATENCY_MS=0 cargo run -- stats
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub log_level: String,
    pub log_json: bool,
    /// Artificial delay before a placed order commits
    pub order_latency_ms: u64,
    /// Base URL for order links in receipts
    pub portal_origin: String,
    pub qr_endpoint: String,
    pub admin_password: String,
}

pub const DEFAULT_ORDER_LATENCY_MS: u64 = 1500;
pub const DEFAULT_PORTAL_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_ADMIN_PASSWORD: &str = "AJ2006";

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            order_latency_ms: std::env::var("ORDER_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ORDER_LATENCY_MS),
            portal_origin: std::env::var("PORTAL_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_PORTAL_ORIGIN.into()),
            qr_endpoint: std::env::var("QR_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_QR_ENDPOINT.into()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into()),
        }
    }

    /// 使用自定义工作目录覆盖
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("portal.redb")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn order_latency(&self) -> Duration {
        Duration::from_millis(self.order_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
