use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Channels a buyer can use to reach a seller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Mobile,
    Instagram,
    Email,
    Link,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Mobile => "mobile",
            ContactMethod::Instagram => "instagram",
            ContactMethod::Email => "email",
            ContactMethod::Link => "link",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(ContactMethod::Mobile),
            "instagram" => Ok(ContactMethod::Instagram),
            "email" => Ok(ContactMethod::Email),
            "link" => Ok(ContactMethod::Link),
            _ => Err(format!("Invalid contact method: {}", s)),
        }
    }
}

// One contact row as edited in the form. The method is kept as a raw
// string so tags the form sends that we don't know about still pass through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub method: String,
    #[serde(default)]
    pub value: String,
}

impl ContactEntry {
    pub fn new(method: ContactMethod, value: &str) -> Self {
        Self {
            id: generate_row_id(),
            method: method.as_str().to_string(),
            value: value.to_string(),
        }
    }

    /// A freshly added row: mobile with an empty value
    pub fn new_row() -> Self {
        Self::new(ContactMethod::Mobile, "")
    }

    /// The known method this row refers to, if any
    pub fn known_method(&self) -> Option<ContactMethod> {
        self.method.parse().ok()
    }
}

fn generate_row_id() -> String {
    format!("contact-{:016x}", rand::random::<u64>())
}

/// Normalized contact information sent with a listing, keyed by method
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ContactMap(BTreeMap<String, String>);

impl ContactMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, method: &str) -> Option<&str> {
        self.0.get(method).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // Only the normalizer writes into the map, so the non-blank invariant
    // is enforced there.
    pub(crate) fn insert(&mut self, method: &str, value: String) {
        self.0.insert(method.to_string(), value);
    }
}

impl<'a> IntoIterator for &'a ContactMap {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
