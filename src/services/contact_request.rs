use tracing::debug;

use crate::error::ValidationError;
use crate::models::request::{ContactRequestDraft, ContactRequestPayload};
use crate::services::contact_info::normalize;

/// Turn what a buyer typed behind a request button into the request body
pub fn compose(draft: &ContactRequestDraft) -> Result<ContactRequestPayload, ValidationError> {
    let message = draft.message.trim();
    if message.is_empty() {
        return Err(ValidationError::MessageRequired);
    }

    let contact_info = normalize(&draft.contacts);
    if contact_info.is_empty() {
        return Err(ValidationError::ContactRequired);
    }

    debug!(
        "Composed contact request with {} contact methods",
        contact_info.len()
    );

    Ok(ContactRequestPayload {
        message: message.to_string(),
        contact_info,
    })
}
