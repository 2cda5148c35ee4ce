use tracing::debug;

use crate::models::contact::{ContactEntry, ContactMap};

/// Collapse the contact rows of a form into one value per method.
///
/// Values are trimmed and blank rows are dropped. When several rows share a
/// method the last non-blank one wins. Unknown method tags are kept as-is.
pub fn normalize(entries: &[ContactEntry]) -> ContactMap {
    let mut contacts = ContactMap::new();

    for entry in entries {
        let value = entry.value.trim();
        if value.is_empty() {
            debug!("Skipping blank contact row {}", entry.id);
            continue;
        }
        if entry.known_method().is_none() {
            debug!("Keeping contact row {} with unknown method '{}'", entry.id, entry.method);
        }
        contacts.insert(&entry.method, value.to_string());
    }

    debug!(
        "Normalized {} contact rows into {} methods",
        entries.len(),
        contacts.len()
    );

    contacts
}
