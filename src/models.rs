use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A price as delivered by an upstream API: either a JSON number or a
/// decimal string that may use a comma as decimal separator ("1234,56").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl From<f64> for PriceValue {
    fn from(value: f64) -> Self {
        PriceValue::Number(value)
    }
}

impl From<&str> for PriceValue {
    fn from(value: &str) -> Self {
        PriceValue::Text(value.to_string())
    }
}

impl fmt::Display for PriceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceValue::Number(n) => write!(f, "{}", n),
            PriceValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Lifecycle state of a source listing. Only active listings are synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Active,
    /// Any other state reported by the source (paused, closed, under_review, ...)
    Inactive(String),
}

impl ListingStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ListingStatus::Active)
    }
}

impl From<&str> for ListingStatus {
    fn from(status: &str) -> Self {
        if status.eq_ignore_ascii_case("active") {
            ListingStatus::Active
        } else {
            ListingStatus::Inactive(status.to_string())
        }
    }
}

/// A listing on the source platform. Its price includes the commission.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceListing {
    pub id: String,
    pub title: String,
    pub price: PriceValue,
    pub currency_id: String,
    pub sku: Option<String>,
    pub status: ListingStatus,
    pub permalink: String,
}

impl SourceListing {
    /// SKU if present and non-blank
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// A priced sub-unit of a target listing (size, color, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
}

impl Variant {
    pub fn current_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

/// A product on the target platform.
///
/// When `variants` is non-empty the product is priced exclusively through
/// them and the top-level `price` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetListing {
    pub id: u64,
    /// Localized names keyed by locale code ("es", "pt", "en")
    #[serde(default)]
    pub name: BTreeMap<String, String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl TargetListing {
    /// Name in the preferred locale, else the first non-empty name by locale order.
    pub fn display_name(&self, preferred_locale: &str) -> Option<&str> {
        self.name
            .get(preferred_locale)
            .filter(|n| !n.is_empty())
            .or_else(|| self.name.values().find(|n| !n.is_empty()))
            .map(String::as_str)
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn current_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Label used in log lines
    pub fn label(&self, preferred_locale: &str) -> String {
        match self.display_name(preferred_locale) {
            Some(name) => format!("'{}' ({})", name, self.id),
            None => format!("product {}", self.id),
        }
    }
}

/// Rule used to pair a source listing with a target listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    #[default]
    BySku,
    ByName,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::BySku => write!(f, "by SKU"),
            MatchStrategy::ByName => write!(f, "by name"),
        }
    }
}

/// Counters for one sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub updated: usize,
    pub unchanged: usize,
    pub unmatched: usize,
}

impl SyncOutcome {
    pub fn total(&self) -> usize {
        self.updated + self.unchanged + self.unmatched
    }
}

/// Accepts a JSON number, a decimal string (with '.' or ','), or null.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<PriceValue> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(PriceValue::Number(n)) => Ok(Some(n)),
        Some(PriceValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(PriceValue::Text(s)) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid price '{}'", s))),
    }
}
