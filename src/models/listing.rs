use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::models::contact::{ContactEntry, ContactMap};

/// Top-level listing kind, decides which draft fields are required
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingCategory {
    Event,
    Travel,
    Other,
}

impl ListingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingCategory::Event => "event",
            ListingCategory::Travel => "travel",
            ListingCategory::Other => "other",
        }
    }
}

impl fmt::Display for ListingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Raw listing form state. Every input arrives as text; numbers are parsed
// during validation so the error messages stay in one place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub category: ListingCategory,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "form_value")]
    pub price: String,
    #[serde(default, deserialize_with = "form_value")]
    pub quantity_available: String,
    #[serde(default)]
    pub description: Option<String>,

    // Event fields
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub ticket_type: String,

    // Shared by event and other
    #[serde(default)]
    pub location: String,

    // Travel fields
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub travel_date: String,
    #[serde(default)]
    pub travel_time: Option<String>,
    #[serde(default)]
    pub transport_mode: String,

    // Other fields
    #[serde(default)]
    pub item_type: String,
}

impl ListingDraft {
    /// An empty draft for the given category, as a form starts out
    pub fn new(category: ListingCategory) -> Self {
        Self {
            category,
            title: String::new(),
            price: String::new(),
            quantity_available: String::new(),
            description: None,
            event_type: String::new(),
            event_date: String::new(),
            event_time: None,
            venue: String::new(),
            ticket_type: String::new(),
            location: String::new(),
            origin: String::new(),
            destination: String::new(),
            travel_date: String::new(),
            travel_time: None,
            transport_mode: String::new(),
            item_type: String::new(),
        }
    }
}

// Accepts either a JSON string or a bare number for numeric form inputs
fn form_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Backend-ready listing body produced from a validated draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingPayload {
    pub title: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub category: ListingCategory,
    pub quantity_available: u64,
    pub description: String,
    pub contact_info: ContactMap,
    pub event_type: String,
    pub event_date: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ticket_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub travel_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transport_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub item_type: Option<String>,
}

// Whole prices go out as integers so the backend sees 500 rather than 500.0
fn serialize_price<S>(price: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if price.fract() == 0.0 && price.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

/// Request body for creating or updating a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSubmission {
    pub draft: ListingDraft,
    #[serde(default)]
    pub contacts: Vec<ContactEntry>,
}
