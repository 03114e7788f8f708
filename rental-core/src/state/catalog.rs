//! Hardware catalog

use super::PortalState;
use crate::audit_log;
use crate::auth::permissions::HARDWARE_MANAGE;
use crate::storage::Namespace;
use shared::AppResult;
use shared::models::{HardwareCreate, HardwareItem};
use shared::util::snowflake_id;

/// Category filter value that matches every item
pub const ALL_CATEGORIES: &str = "All";

impl PortalState {
    // ========== Mutations (hardware:manage) ==========

    /// Append a new catalog item with a fresh id
    pub fn add_hardware(&self, create: HardwareCreate) -> AppResult<HardwareItem> {
        let admin = self.require(HARDWARE_MANAGE)?;

        let mut hardware = self.inner.hardware.write();
        let id = loop {
            let candidate = snowflake_id().to_string();
            if !hardware.iter().any(|h| h.id == candidate) {
                break candidate;
            }
        };
        let item = create.into_item(id);
        hardware.push(item.clone());
        self.inner.persistence.save(Namespace::Hardware, &*hardware);

        tracing::info!(hardware_id = %item.id, name = %item.name, "Hardware added");
        audit_log!(admin.id.as_str(), "create", format!("hardware:{}", item.id), item.name.as_str());
        Ok(item)
    }

    /// Replace the entry with the same id. `Ok(false)` if it does not exist.
    pub fn update_hardware(&self, item: HardwareItem) -> AppResult<bool> {
        let admin = self.require(HARDWARE_MANAGE)?;

        let mut hardware = self.inner.hardware.write();
        let Some(entry) = hardware.iter_mut().find(|h| h.id == item.id) else {
            tracing::debug!(hardware_id = %item.id, "Hardware update for unknown id ignored");
            return Ok(false);
        };
        *entry = item;
        let id = entry.id.clone();
        self.inner.persistence.save(Namespace::Hardware, &*hardware);

        tracing::info!(hardware_id = %id, "Hardware updated");
        audit_log!(admin.id.as_str(), "update", format!("hardware:{}", id));
        Ok(true)
    }

    /// Remove an entry. `Ok(false)` if it does not exist.
    ///
    /// Carts and past orders keep their own copies of the item.
    pub fn delete_hardware(&self, id: &str) -> AppResult<bool> {
        let admin = self.require(HARDWARE_MANAGE)?;

        let mut hardware = self.inner.hardware.write();
        let before = hardware.len();
        hardware.retain(|h| h.id != id);
        if hardware.len() == before {
            tracing::debug!(hardware_id = %id, "Hardware delete for unknown id ignored");
            return Ok(false);
        }
        self.inner.persistence.save(Namespace::Hardware, &*hardware);

        tracing::info!(hardware_id = %id, "Hardware deleted");
        audit_log!(admin.id.as_str(), "delete", format!("hardware:{}", id));
        Ok(true)
    }

    // ========== Reads ==========

    pub fn hardware(&self) -> Vec<HardwareItem> {
        self.inner.hardware.read().clone()
    }

    pub fn hardware_item(&self, id: &str) -> Option<HardwareItem> {
        self.inner.hardware.read().iter().find(|h| h.id == id).cloned()
    }

    /// Catalog browse: name contains `query` (case-insensitive) and the
    /// category matches exactly. `None` or `"All"` matches any category.
    pub fn search_hardware(&self, query: &str, category: Option<&str>) -> Vec<HardwareItem> {
        let needle = query.to_lowercase();
        let category = category.filter(|c| *c != ALL_CATEGORIES);

        self.inner
            .hardware
            .read()
            .iter()
            .filter(|h| h.name.to_lowercase().contains(&needle))
            .filter(|h| category.is_none_or(|c| h.category == c))
            .cloned()
            .collect()
    }

    /// Inventory view: name or category contains `query` (case-insensitive)
    pub fn search_inventory(&self, query: &str) -> Vec<HardwareItem> {
        let needle = query.to_lowercase();
        self.inner
            .hardware
            .read()
            .iter()
            .filter(|h| {
                h.name.to_lowercase().contains(&needle)
                    || h.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for item in self.inner.hardware.read().iter() {
            if !seen.contains(&item.category) {
                seen.push(item.category.clone());
            }
        }
        seen
    }
}
