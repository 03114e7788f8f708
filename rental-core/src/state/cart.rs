//! Cart

use super::PortalState;
use crate::storage::Namespace;
use shared::models::{HardwareItem, total_price};
use shared::{AppError, AppResult, ErrorCode};
use std::collections::HashSet;

impl PortalState {
    /// Append `item` unless an entry with the same id is already present.
    ///
    /// Returns `Ok(false)` for the duplicate case. Unavailable items are
    /// refused.
    pub fn add_to_cart(&self, item: &HardwareItem) -> AppResult<bool> {
        if !item.available {
            tracing::warn!(hardware_id = %item.id, "Unavailable item refused");
            return Err(AppError::with_message(
                ErrorCode::HardwareUnavailable,
                format!("{} is currently unavailable", item.name),
            )
            .with_detail("hardware_id", item.id.as_str()));
        }

        let mut cart = self.inner.cart.write();
        if cart.iter().any(|i| i.id == item.id) {
            tracing::debug!(hardware_id = %item.id, "Item already in cart");
            return Ok(false);
        }
        cart.push(item.clone());
        self.inner.persistence.save(Namespace::Cart, &*cart);

        tracing::info!(hardware_id = %item.id, cart_size = cart.len(), "Added to cart");
        Ok(true)
    }

    pub fn remove_from_cart(&self, id: &str) {
        self.remove_batch_from_cart(&[id]);
    }

    /// Drop every entry whose id is in `ids`, keeping the rest in order
    pub fn remove_batch_from_cart<S: AsRef<str>>(&self, ids: &[S]) {
        let ids: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();

        let mut cart = self.inner.cart.write();
        let before = cart.len();
        cart.retain(|i| !ids.contains(i.id.as_str()));
        let removed = before - cart.len();
        if removed == 0 {
            tracing::debug!("No matching cart entries to remove");
            return;
        }
        self.inner.persistence.save(Namespace::Cart, &*cart);
        tracing::info!(removed, cart_size = cart.len(), "Removed from cart");
    }

    pub fn clear_cart(&self) {
        let mut cart = self.inner.cart.write();
        cart.clear();
        self.inner.persistence.save(Namespace::Cart, &*cart);
        tracing::info!("Cart cleared");
    }

    pub fn cart(&self) -> Vec<HardwareItem> {
        self.inner.cart.read().clone()
    }

    /// Per-day total of the cart, or of the selected ids when given
    pub fn cart_total(&self, ids: Option<&[String]>) -> u64 {
        let cart = self.inner.cart.read();
        match ids {
            Some(ids) => total_price(cart.iter().filter(|i| ids.contains(&i.id))),
            None => total_price(cart.iter()),
        }
    }
}
