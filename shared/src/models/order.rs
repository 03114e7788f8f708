//! Order Model

use super::hardware::HardwareItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rental order status
///
/// ```text
/// PENDING ──► APPROVED ──► DELIVERED ──► RETURNED
///    │
///    └──────► REJECTED
/// ```
///
/// REJECTED and RETURNED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Delivered,
    Returned,
    Rejected,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Approved,
        OrderStatus::Delivered,
        OrderStatus::Returned,
        OrderStatus::Rejected,
    ];

    /// Statuses reachable in one step from this one
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Approved, OrderStatus::Rejected],
            OrderStatus::Approved => &[OrderStatus::Delivered],
            OrderStatus::Delivered => &[OrderStatus::Returned],
            OrderStatus::Returned | OrderStatus::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Counted as an active rental in order listings (awaiting approval,
    /// awaiting pickup, or currently rented)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Approved | OrderStatus::Delivered
        )
    }

    /// Closed one way or another
    pub fn is_completed(&self) -> bool {
        matches!(self, OrderStatus::Returned | OrderStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Returned => "RETURNED",
            OrderStatus::Rejected => "REJECTED",
        }
    }

    /// Parse the upper-case wire name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
///
/// `items` is a snapshot of the catalog entries at checkout time, so later
/// catalog edits or deletes leave historical orders untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `ORD-<n>`
    pub id: String,
    /// Submitting user id, `guest` without a session
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub items: Vec<HardwareItem>,
    /// Sum of the snapshotted items' `price_per_day`, fixed at creation
    pub total_amount: u64,
    pub status: OrderStatus,
    /// RFC 3339 creation timestamp
    pub date: String,
    /// Formatted delivery address
    pub address: String,
    pub college_id: String,
    pub contact: String,
}

impl Order {
    /// Case-insensitive match against the order id and item names
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.id.to_lowercase().contains(&needle)
            || self
                .items
                .iter()
                .any(|item| item.name.to_lowercase().contains(&needle))
    }
}

/// Checkout form submitted by the booking workflow
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Formatted address string produced by the address form
    pub address: String,
    pub college_id: String,
}

/// Stage shown in the order progress tracker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackerStage {
    Placed,
    Approved,
    Collected,
    Returned,
}

impl TrackerStage {
    pub const ALL: [TrackerStage; 4] = [
        TrackerStage::Placed,
        TrackerStage::Approved,
        TrackerStage::Collected,
        TrackerStage::Returned,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackerStage::Placed => "Placed",
            TrackerStage::Approved => "Approved",
            TrackerStage::Collected => "Collected",
            TrackerStage::Returned => "Returned",
        }
    }
}

/// Display state of one tracker stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Pending,
    Rejected,
}

/// One row of the order progress tracker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerStep {
    pub stage: TrackerStage,
    pub state: StepState,
}

impl TrackerStage {
    /// State of this stage for an order in `status`
    pub fn state_for(&self, status: OrderStatus) -> StepState {
        use OrderStatus as S;

        if status == S::Rejected {
            return StepState::Rejected;
        }
        match self {
            TrackerStage::Placed => StepState::Completed,
            TrackerStage::Approved => match status {
                S::Pending => StepState::Current,
                _ => StepState::Completed,
            },
            // Approved orders wait for pickup
            TrackerStage::Collected => match status {
                S::Delivered | S::Returned => StepState::Completed,
                _ => StepState::Pending,
            },
            TrackerStage::Returned => match status {
                S::Returned => StepState::Completed,
                S::Delivered => StepState::Current,
                _ => StepState::Pending,
            },
        }
    }
}

/// Full tracker for an order
pub fn order_tracker(status: OrderStatus) -> Vec<TrackerStep> {
    TrackerStage::ALL
        .into_iter()
        .map(|stage| TrackerStep {
            stage,
            state: stage.state_for(status),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Delivered));
        assert!(Delivered.can_transition_to(Returned));

        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Delivered.can_transition_to(Approved));

        for next in OrderStatus::ALL {
            assert!(!Rejected.can_transition_to(next));
            assert!(!Returned.can_transition_to(next));
        }
        assert!(Rejected.is_terminal());
        assert!(Returned.is_terminal());
        assert!(!Approved.is_terminal());
    }

    #[test]
    fn test_active_and_completed_partition() {
        for status in OrderStatus::ALL {
            assert_ne!(status.is_active(), status.is_completed(), "{}", status);
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"DELIVERED\""
        );
        assert_eq!(OrderStatus::parse("approved"), Some(OrderStatus::Approved));
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_tracker_for_pending() {
        let steps = order_tracker(OrderStatus::Pending);
        let states: Vec<_> = steps.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                StepState::Completed,
                StepState::Current,
                StepState::Pending,
                StepState::Pending
            ]
        );
    }

    #[test]
    fn test_tracker_for_delivered() {
        let states: Vec<_> = order_tracker(OrderStatus::Delivered)
            .iter()
            .map(|s| s.state)
            .collect();
        assert_eq!(
            states,
            vec![
                StepState::Completed,
                StepState::Completed,
                StepState::Completed,
                StepState::Current
            ]
        );
    }

    #[test]
    fn test_tracker_for_rejected_marks_every_stage() {
        assert!(order_tracker(OrderStatus::Rejected)
            .iter()
            .all(|s| s.state == StepState::Rejected));
    }
}
