//! Orders: checkout commit and status transitions
//!
//! `place_order` validates synchronously, then hands the commit to a
//! background task that waits out the configured latency. The returned
//! [`PendingOrder`] resolves once the order is committed. Dropping it
//! does not stop the commit; [`PendingOrder::cancel`] does, as long as the
//! commit has not started.

use super::{Inner, PortalState};
use crate::audit_log;
use crate::auth::permissions::ORDERS_MANAGE;
use crate::storage::Namespace;
use parking_lot::Mutex;
use rand::Rng;
use shared::models::{CheckoutDetails, HardwareItem, Order, OrderStatus, User, total_price};
use shared::util::{now_iso, snowflake_id};
use shared::{AppError, AppResult, ErrorCode};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Size of the short order id space (`ORD-0` .. `ORD-9999`)
const SHORT_ID_SPACE: u32 = 10_000;

/// Owner id recorded for orders placed without a session
pub const GUEST_USER_ID: &str = "guest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Committed,
    Cancelled,
}

/// In-flight order placement
///
/// Resolves to the committed order. Dropping the handle leaves the commit
/// running.
#[derive(Debug)]
pub struct PendingOrder {
    rx: oneshot::Receiver<AppResult<Order>>,
    phase: Arc<Mutex<Phase>>,
    cancel: CancellationToken,
}

impl PendingOrder {
    /// Stop the commit if it has not happened yet.
    ///
    /// Returns `true` when the order will not be created; the handle then
    /// resolves to an `OrderCancelled` error.
    pub fn cancel(&self) -> bool {
        let mut phase = self.phase.lock();
        match *phase {
            Phase::Waiting => {
                *phase = Phase::Cancelled;
                self.cancel.cancel();
                true
            }
            Phase::Cancelled => true,
            Phase::Committed => false,
        }
    }

    pub fn is_committed(&self) -> bool {
        *self.phase.lock() == Phase::Committed
    }
}

impl Future for PendingOrder {
    type Output = AppResult<Order>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.rx).poll(cx).map(|result| {
            result.unwrap_or_else(|_| Err(AppError::internal("Order task ended without a result")))
        })
    }
}

impl PortalState {
    /// Turn `items` (or the whole cart when `None`) into a pending order.
    ///
    /// Must be called inside a Tokio runtime. Refuses an empty item list.
    /// The commit prepends the order and removes exactly the ordered ids
    /// from the cart; other cart entries stay.
    pub fn place_order(
        &self,
        details: CheckoutDetails,
        items: Option<Vec<HardwareItem>>,
    ) -> AppResult<PendingOrder> {
        let items = items.unwrap_or_else(|| self.cart());
        if items.is_empty() {
            tracing::warn!("Checkout refused: no items");
            return Err(AppError::new(ErrorCode::EmptyOrder));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| AppError::internal("place_order requires a Tokio runtime"))?;

        let placed_by = self.current_user();
        let phase = Arc::new(Mutex::new(Phase::Waiting));
        let cancel = CancellationToken::new();
        let (tx, rx) = oneshot::channel();

        let inner = self.inner.clone();
        let task_phase = phase.clone();
        let task_cancel = cancel.clone();
        let latency = inner.options.order_latency;

        tracing::debug!(items = items.len(), latency_ms = latency.as_millis() as u64, "Order placement started");

        runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = task_cancel.cancelled() => {}
                _ = tokio::time::sleep(latency) => {}
            }

            let result = {
                let mut phase = task_phase.lock();
                if *phase == Phase::Cancelled {
                    Err(AppError::new(ErrorCode::OrderCancelled))
                } else {
                    *phase = Phase::Committed;
                    Ok(inner.commit_order(placed_by.as_ref(), &details, items))
                }
            };

            if result.is_err() {
                tracing::info!("Order placement cancelled before commit");
            }
            // Receiver may be gone (fire-and-forget)
            let _ = tx.send(result);
        });

        Ok(PendingOrder { rx, phase, cancel })
    }

    /// Move an order along the status table.
    ///
    /// `Ok(None)` when no order has this id (nothing changes). Illegal
    /// edges are refused with `InvalidStatusTransition`.
    pub fn update_order_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Option<Order>> {
        let admin = self.require(ORDERS_MANAGE)?;

        let mut orders = self.inner.orders.write();
        let Some(order) = orders.iter_mut().find(|o| o.id == order_id) else {
            tracing::debug!(order_id, "Status update for unknown order ignored");
            return Ok(None);
        };

        let from = order.status;
        if !from.can_transition_to(status) {
            tracing::warn!(order_id, from = %from, to = %status, "Illegal status transition refused");
            return Err(AppError::invalid_transition(order_id, from.as_str(), status.as_str()));
        }

        order.status = status;
        let updated = order.clone();
        self.inner.persistence.save(Namespace::Orders, &*orders);

        tracing::info!(order_id, from = %from, to = %status, "Order status updated");
        audit_log!(
            admin.id.as_str(),
            "update_status",
            format!("order:{}", order_id),
            format!("{} -> {}", from, status)
        );
        Ok(Some(updated))
    }

    /// All orders, newest first
    pub fn orders(&self) -> Vec<Order> {
        self.inner.orders.read().clone()
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.inner.orders.read().iter().find(|o| o.id == order_id).cloned()
    }
}

impl Inner {
    fn commit_order(&self, placed_by: Option<&User>, details: &CheckoutDetails, items: Vec<HardwareItem>) -> Order {
        let mut orders = self.orders.write();

        let order = Order {
            id: next_order_id(&orders),
            user_id: placed_by.map_or_else(|| GUEST_USER_ID.to_string(), |u| u.id.clone()),
            user_name: details.full_name.clone(),
            user_email: details.email.clone(),
            total_amount: total_price(&items),
            items,
            status: OrderStatus::Pending,
            date: now_iso(),
            address: details.address.clone(),
            college_id: details.college_id.clone(),
            contact: details.phone.clone(),
        };

        orders.insert(0, order.clone());
        self.persistence.save(Namespace::Orders, &*orders);

        let ordered: HashSet<&str> = order.items.iter().map(|i| i.id.as_str()).collect();
        {
            let mut cart = self.cart.write();
            cart.retain(|i| !ordered.contains(i.id.as_str()));
            self.persistence.save(Namespace::Cart, &*cart);
        }

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            items = order.items.len(),
            total = order.total_amount,
            "Order placed"
        );
        order
    }
}

/// `ORD-<n>` with n in the short id space, unique among `orders`.
/// Falls back to a snowflake suffix once the short space is full.
fn next_order_id(orders: &[Order]) -> String {
    let taken: HashSet<&str> = orders.iter().map(|o| o.id.as_str()).collect();

    let start = rand::thread_rng().gen_range(0..SHORT_ID_SPACE);
    for offset in 0..SHORT_ID_SPACE {
        let candidate = format!("ORD-{}", (start + offset) % SHORT_ID_SPACE);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }

    tracing::warn!("Short order id space exhausted, using long ids");
    loop {
        let candidate = format!("ORD-{}", snowflake_id());
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}
