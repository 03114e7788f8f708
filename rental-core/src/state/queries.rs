//! Read-side order views: per-user listings, dashboard counters, admin history

use super::PortalState;
use crate::auth::permissions::USERS_VIEW;
use serde::Serialize;
use shared::AppResult;
use shared::models::{Order, OrderStatus, TrackerStep};

/// Tab filter on the "my orders" page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFilter {
    #[default]
    All,
    /// PENDING, APPROVED or DELIVERED
    Active,
    /// RETURNED or REJECTED
    Completed,
}

impl OrderFilter {
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            OrderFilter::All => true,
            OrderFilter::Active => status.is_active(),
            OrderFilter::Completed => status.is_completed(),
        }
    }
}

/// Counters on the student dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: usize,
    /// Approved or currently rented
    pub active_rentals: usize,
    pub pending: usize,
}

/// One user's rental history (admin user detail view)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserHistory {
    pub orders: Vec<Order>,
    pub active_count: usize,
}

fn is_rented(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Approved | OrderStatus::Delivered)
}

impl PortalState {
    /// Orders owned by `user_id`, newest first
    pub fn orders_for_user(&self, user_id: &str) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .inner
            .orders
            .read()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        // RFC 3339 strings in the same offset sort chronologically
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        orders
    }

    /// Session user's orders after the tab filter and search box.
    /// Empty without a session.
    pub fn my_orders(&self, filter: OrderFilter, search: &str) -> Vec<Order> {
        let Some(user) = self.current_user() else {
            return Vec::new();
        };
        self.orders_for_user(&user.id)
            .into_iter()
            .filter(|o| filter.matches(o.status))
            .filter(|o| o.matches_search(search))
            .collect()
    }

    /// Counters for the session user; all zero without a session
    pub fn dashboard(&self) -> DashboardSummary {
        let Some(user) = self.current_user() else {
            return DashboardSummary::default();
        };
        let orders = self.inner.orders.read();
        let mine = orders.iter().filter(|o| o.user_id == user.id);

        let mut summary = DashboardSummary::default();
        for order in mine {
            summary.total += 1;
            if is_rented(order.status) {
                summary.active_rentals += 1;
            }
            if order.status == OrderStatus::Pending {
                summary.pending += 1;
            }
        }
        summary
    }

    pub fn user_history(&self, user_id: &str) -> AppResult<UserHistory> {
        self.require(USERS_VIEW)?;

        let orders = self.orders_for_user(user_id);
        let active_count = orders.iter().filter(|o| is_rented(o.status)).count();
        Ok(UserHistory {
            orders,
            active_count,
        })
    }

    pub fn order_tracker(&self, order: &Order) -> Vec<TrackerStep> {
        shared::models::order_tracker(order.status)
    }
}
