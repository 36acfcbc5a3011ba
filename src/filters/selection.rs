//! Facet selection and the immutable applied-filter snapshot.

use serde::{Deserialize, Serialize};

/// Sentinel facet value meaning "no constraint".
pub const ANY: &str = "Any";

pub const CENTURIES: &[&str] = &[
    ANY, "21st", "20th", "19th", "18th", "17th", "16th",
    "15th", "14th", "13th", "12th", "11th", "10th",
];

pub const CLASSIFICATIONS: &[&str] = &[
    ANY, "Paintings", "Photographs", "Prints", "Sculpture",
    "Textile Arts", "Vessels", "Coins", "Jewelry",
];

/// The debounced snapshot that drives a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub culture: String,
    pub century: String,
    pub classification: String,
    pub random: bool,
}

impl Default for AppliedFilters {
    fn default() -> Self {
        Self::new(ANY, ANY, ANY, false)
    }
}

impl AppliedFilters {
    pub fn new(culture: &str, century: &str, classification: &str, random: bool) -> Self {
        Self {
            culture: normalize(culture),
            century: normalize(century),
            classification: normalize(classification),
            random,
        }
    }

    pub fn culture(&self) -> Option<&str> {
        constrained(&self.culture)
    }

    pub fn century(&self) -> Option<&str> {
        constrained(&self.century)
    }

    pub fn classification(&self) -> Option<&str> {
        constrained(&self.classification)
    }
}

/// A single user interaction with the filter sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "facet", content = "value", rename_all = "snake_case")]
pub enum FilterEvent {
    Culture(String),
    Century(String),
    Classification(String),
    Random(bool),
    Reset,
    /// Apply the current selection without waiting for the debounce window.
    ApplyNow,
}

/// Live facet selection, mutated by events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub culture: String,
    pub century: String,
    pub classification: String,
    pub random: bool,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            culture: ANY.to_string(),
            century: ANY.to_string(),
            classification: ANY.to_string(),
            random: false,
        }
    }
}

impl FilterSelection {
    /// Apply an event. Returns whether any facet changed.
    pub fn apply(&mut self, event: FilterEvent) -> bool {
        let before = self.clone();
        match event {
            FilterEvent::Culture(v) => self.culture = normalize(&v),
            FilterEvent::Century(v) => self.century = normalize(&v),
            FilterEvent::Classification(v) => self.classification = normalize(&v),
            FilterEvent::Random(v) => self.random = v,
            FilterEvent::Reset => *self = Self::default(),
            FilterEvent::ApplyNow => {}
        }
        *self != before
    }

    pub fn snapshot(&self) -> AppliedFilters {
        AppliedFilters {
            culture: self.culture.clone(),
            century: self.century.clone(),
            classification: self.classification.clone(),
            random: self.random,
        }
    }
}

impl From<&AppliedFilters> for FilterSelection {
    fn from(applied: &AppliedFilters) -> Self {
        Self {
            culture: applied.culture.clone(),
            century: applied.century.clone(),
            classification: applied.classification.clone(),
            random: applied.random,
        }
    }
}

/// Trim, and fold blanks and any casing of "any" into the sentinel.
fn normalize(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ANY) {
        ANY.to_string()
    } else {
        value.to_string()
    }
}

fn constrained(value: &str) -> Option<&str> {
    (value != ANY).then_some(value)
}
