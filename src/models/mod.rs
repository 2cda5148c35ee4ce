pub mod common;
pub mod contact;
pub mod listing;
pub mod request;
