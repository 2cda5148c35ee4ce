pub mod contact_info;
pub mod contact_request;
pub mod listing_payload;
