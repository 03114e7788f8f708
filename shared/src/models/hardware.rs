//! Hardware Model

use serde::{Deserialize, Serialize};

/// Rentable catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HardwareItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Rental price per day in whole rupees
    pub price_per_day: u32,
    /// Image URI
    pub image: String,
    pub available: bool,
    pub stock: u32,
    /// Free-text category label
    pub category: String,
}

/// Create hardware payload (item without id)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HardwareCreate {
    pub name: String,
    pub description: String,
    pub price_per_day: u32,
    pub image: String,
    pub available: bool,
    pub stock: u32,
    pub category: String,
}

impl HardwareCreate {
    /// Attach an id, producing a catalog item
    pub fn into_item(self, id: String) -> HardwareItem {
        HardwareItem {
            id,
            name: self.name,
            description: self.description,
            price_per_day: self.price_per_day,
            image: self.image,
            available: self.available,
            stock: self.stock,
            category: self.category,
        }
    }
}

/// Sum of `price_per_day` over a list of items
pub fn total_price<'a>(items: impl IntoIterator<Item = &'a HardwareItem>) -> u64 {
    items
        .into_iter()
        .map(|item| u64::from(item.price_per_day))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: u32) -> HardwareItem {
        HardwareItem {
            id: id.into(),
            name: format!("Item {}", id),
            description: String::new(),
            price_per_day: price,
            image: String::new(),
            available: true,
            stock: 1,
            category: "Sensors".into(),
        }
    }

    #[test]
    fn test_total_price() {
        let items = vec![item("1", 50), item("2", 150)];
        assert_eq!(total_price(&items), 200);
        assert_eq!(total_price(&Vec::<HardwareItem>::new()), 0);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(item("1", 50)).unwrap();
        assert_eq!(json["pricePerDay"], 50);
        assert_eq!(json["available"], true);
    }
}
