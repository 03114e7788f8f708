//! Delivery address form
//!
//! Country → state → city comes from a fixed lookup table. Road names get
//! suggestions from a per-city street list, falling back to a generic list
//! for cities without one.

use serde::{Deserialize, Serialize};
use shared::FieldErrors;

pub const DEFAULT_COUNTRY: &str = "India";
pub const PINCODE_LEN: usize = 6;

const COUNTRIES: &[&str] = &["India", "United States", "United Kingdom"];

const STATES: Table = &[
    (
        "India",
        &["Tamil Nadu", "Karnataka", "Maharashtra", "Kerala", "Telangana", "Delhi"],
    ),
    ("United States", &["California", "New York", "Texas"]),
    ("United Kingdom", &["England", "Scotland"]),
];

const CITIES: Table = &[
    (
        "Tamil Nadu",
        &["Salem", "Chennai", "Coimbatore", "Madurai", "Trichy", "Erode"],
    ),
    ("Karnataka", &["Bangalore", "Mysore", "Mangalore"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur"]),
    ("Kerala", &["Kochi", "Trivandrum", "Calicut"]),
    ("Telangana", &["Hyderabad", "Warangal"]),
    ("Delhi", &["New Delhi", "Noida", "Gurgaon"]),
    ("California", &["Los Angeles", "San Francisco"]),
    ("New York", &["New York City", "Buffalo"]),
    ("England", &["London", "Manchester"]),
];

const STREETS: Table = &[
    (
        "Salem",
        &[
            "Junction Main Road",
            "Omalur Main Road",
            "Sarada College Road",
            "Cherry Road",
            "Five Roads",
            "Hasthampatti",
            "Fairlands",
            "Ammapet",
            "Suramangalam",
            "Sona Nagar",
        ],
    ),
    (
        "Chennai",
        &[
            "Anna Salai",
            "Old Mahabalipuram Road (OMR)",
            "East Coast Road (ECR)",
            "T. Nagar",
            "Velachery Main Road",
            "Adyar",
            "Mylapore",
            "Nungambakkam",
        ],
    ),
    (
        "Coimbatore",
        &["Avinashi Road", "Gandhipuram", "RS Puram", "Peelamedu", "Saravanampatti"],
    ),
    (
        "Bangalore",
        &[
            "MG Road",
            "Indiranagar",
            "Koramangala",
            "Whitefield",
            "Marathahalli",
            "Electronic City",
        ],
    ),
    (
        "Madurai",
        &["KK Nagar", "Anna Nagar", "Bye Pass Road", "Kalavasal", "Simmakkal"],
    ),
];

/// Used for cities without a street list
const GENERIC_STREETS: &[&str] = &[
    "Main Road",
    "Station Road",
    "Gandhi Nagar",
    "Nehru Street",
    "Market Road",
    "Church Street",
    "Temple Road",
];

type Table = &'static [(&'static str, &'static [&'static str])];

fn lookup(table: Table, key: &str) -> &'static [&'static str] {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, values)| *values)
        .unwrap_or(&[])
}

pub fn countries() -> &'static [&'static str] {
    COUNTRIES
}

/// States of `country`; empty for unknown countries
pub fn states(country: &str) -> &'static [&'static str] {
    lookup(STATES, country)
}

/// Cities of `state`; empty for unknown states
pub fn cities(state: &str) -> &'static [&'static str] {
    lookup(CITIES, state)
}

/// Road names for `city` containing `input` (case-insensitive).
/// Empty input yields nothing.
pub fn road_suggestions(city: &str, input: &str) -> Vec<&'static str> {
    if input.is_empty() {
        return Vec::new();
    }
    let streets = match lookup(STREETS, city) {
        [] => GENERIC_STREETS,
        streets => streets,
    };
    let needle = input.to_lowercase();
    streets
        .iter()
        .copied()
        .filter(|street| street.to_lowercase().contains(&needle))
        .collect()
}

/// Label attached to a saved address
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AddressKind {
    #[default]
    Home,
    Work,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub country: String,
    pub state: String,
    pub city: String,
    pub pincode: String,
    pub house_no: String,
    pub road_name: String,
    #[serde(rename = "type")]
    pub kind: AddressKind,
}

impl Default for AddressForm {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            state: String::new(),
            city: String::new(),
            pincode: String::new(),
            house_no: String::new(),
            road_name: String::new(),
            kind: AddressKind::default(),
        }
    }
}

impl AddressForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change country; clears state and city
    pub fn set_country(&mut self, country: impl Into<String>) {
        self.country = country.into();
        self.state.clear();
        self.city.clear();
    }

    /// Change state; clears city
    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
        self.city.clear();
    }

    /// Pincode input box: digits only, at most six
    pub fn set_pincode(&mut self, input: &str) {
        self.pincode = input
            .chars()
            .filter(char::is_ascii_digit)
            .take(PINCODE_LEN)
            .collect();
    }

    /// Suggestions for the current road name in the selected city
    pub fn road_suggestions(&self) -> Vec<&'static str> {
        road_suggestions(&self.city, &self.road_name)
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.state.is_empty() {
            errors.insert("state", "State is required");
        } else if !states(&self.country).contains(&self.state.as_str()) {
            errors.insert("state", "Unknown state");
        }

        if self.city.is_empty() {
            errors.insert("city", "City is required");
        } else if !cities(&self.state).contains(&self.city.as_str()) {
            errors.insert("city", "Unknown city");
        }

        if self.pincode.len() != PINCODE_LEN || !self.pincode.chars().all(|c| c.is_ascii_digit()) {
            errors.insert("pincode", "Valid Pincode required");
        }
        if self.house_no.trim().is_empty() {
            errors.insert("houseNo", "House/Building No. required");
        }
        if self.road_name.trim().is_empty() {
            errors.insert("roadName", "Road/Area required");
        }
        errors
    }

    /// `<house>, <road>, <city>, <state> - <pincode>, <country>`
    pub fn format(&self) -> String {
        format!(
            "{}, {}, {}, {} - {}, {}",
            self.house_no, self.road_name, self.city, self.state, self.pincode, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> AddressForm {
        AddressForm {
            country: "India".into(),
            state: "Tamil Nadu".into(),
            city: "Salem".into(),
            pincode: "636005".into(),
            house_no: "Room 1".into(),
            road_name: "Main Road".into(),
            kind: AddressKind::Home,
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(
            filled().format(),
            "Room 1, Main Road, Salem, Tamil Nadu - 636005, India"
        );
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(countries().len(), 3);
        assert!(states("India").contains(&"Kerala"));
        assert_eq!(cities("Karnataka"), &["Bangalore", "Mysore", "Mangalore"]);
        assert!(states("Atlantis").is_empty());
        // Texas has no city list
        assert!(cities("Texas").is_empty());
    }

    #[test]
    fn test_road_suggestions_for_known_city() {
        assert_eq!(
            road_suggestions("Salem", "main"),
            vec!["Junction Main Road", "Omalur Main Road"]
        );
        assert_eq!(road_suggestions("Chennai", "OMR"), vec!["Old Mahabalipuram Road (OMR)"]);
    }

    #[test]
    fn test_road_suggestions_fall_back_to_generic() {
        assert_eq!(road_suggestions("Erode", "road"), vec!["Main Road", "Station Road", "Market Road", "Temple Road"]);
        assert!(road_suggestions("Salem", "").is_empty());
        assert!(road_suggestions("Salem", "zzz").is_empty());
    }

    #[test]
    fn test_validate_complete_form() {
        assert!(filled().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_each_field() {
        let errors = AddressForm::new().validate();
        for field in ["state", "city", "pincode", "houseNo", "roadName"] {
            assert!(errors.contains(field), "{}", field);
        }

        let mut form = filled();
        form.pincode = "63600".into();
        form.city = "London".into();
        let errors = form.validate();
        assert_eq!(errors.get("pincode"), Some("Valid Pincode required"));
        assert_eq!(errors.get("city"), Some("Unknown city"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_dependent_fields_reset() {
        let mut form = filled();
        form.set_state("Kerala");
        assert_eq!(form.state, "Kerala");
        assert!(form.city.is_empty());

        let mut form = filled();
        form.set_country("United Kingdom");
        assert!(form.state.is_empty());
        assert!(form.city.is_empty());
    }

    #[test]
    fn test_pincode_input_normalized() {
        let mut form = AddressForm::new();
        form.set_pincode("636-0051");
        assert_eq!(form.pincode, "636005");
        assert_eq!(form.country, DEFAULT_COUNTRY);
    }
}
