//! Rental receipt (gate pass)

use crate::config::{Config, DEFAULT_PORTAL_ORIGIN, DEFAULT_QR_ENDPOINT};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::models::Order;
use shared::{AppError, AppResult};
use url::Url;

/// Days an item may be kept before late fees apply
pub const RENTAL_PERIOD_DAYS: i64 = 7;
/// ₹ per day past the return date
pub const LATE_FEE_PER_DAY: u32 = 50;

pub const TERMS: &[&str] = &[
    "Items must be returned within 7 days.",
    "User is liable for any physical damage.",
    "Late returns incur ₹50/day fine.",
    "This receipt serves as a gate pass.",
];

const QR_SIZE: &str = "150x150";
const QR_COLOR: &str = "111827";

#[derive(Debug, Clone)]
pub struct ReceiptConfig {
    /// Base URL the portal is served from
    pub origin: String,
    /// QR image service
    pub qr_endpoint: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_PORTAL_ORIGIN.to_string(),
            qr_endpoint: DEFAULT_QR_ENDPOINT.to_string(),
        }
    }
}

impl From<&Config> for ReceiptConfig {
    fn from(config: &Config) -> Self {
        Self {
            origin: config.portal_origin.clone(),
            qr_endpoint: config.qr_endpoint.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order: Order,
    /// Link back to the order detail page
    pub order_url: String,
    /// Image URL of a QR code encoding `order_url`
    pub qr_code_url: String,
    /// `YYYY-MM-DD`
    pub issued_on: String,
    /// `YYYY-MM-DD`
    pub return_due: String,
    pub late_fee_per_day: u32,
    pub terms: &'static [&'static str],
}

impl Receipt {
    pub fn for_order(order: &Order, config: &ReceiptConfig) -> AppResult<Self> {
        let placed: DateTime<Utc> = DateTime::parse_from_rfc3339(&order.date)
            .map_err(|e| {
                AppError::validation(format!("Order date is not RFC 3339: {}", e))
                    .with_detail("order_id", order.id.as_str())
            })?
            .with_timezone(&Utc);
        let due = placed + Duration::days(RENTAL_PERIOD_DAYS);

        let order_url = order_url(&config.origin, &order.id);
        let qr_code_url = qr_code_url(&config.qr_endpoint, &order_url)?;

        Ok(Self {
            order: order.clone(),
            order_url,
            qr_code_url,
            issued_on: placed.format("%Y-%m-%d").to_string(),
            return_due: due.format("%Y-%m-%d").to_string(),
            late_fee_per_day: LATE_FEE_PER_DAY,
            terms: TERMS,
        })
    }
}

/// `<origin>/#/order/<id>`
pub fn order_url(origin: &str, order_id: &str) -> String {
    format!("{}/#/order/{}", origin.trim_end_matches('/'), order_id)
}

fn qr_code_url(endpoint: &str, data: &str) -> AppResult<String> {
    let mut url = Url::parse(endpoint).map_err(|e| {
        AppError::internal(format!("Invalid QR endpoint: {}", e)).with_detail("endpoint", endpoint)
    })?;
    url.query_pairs_mut()
        .append_pair("size", QR_SIZE)
        .append_pair("data", data)
        .append_pair("color", QR_COLOR);
    Ok(url.into())
}
