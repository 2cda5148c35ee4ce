//! Campus Marketplace Listing Service
//!
//! This library turns raw marketplace form submissions into validated
//! payloads and forwards them to the marketplace REST API. It sits between
//! the student marketplace front end and its backend.
//!
//! # Modules
//!
//! - `services`: contact normalization, listing payload building and
//!   contact request composition
//! - `client`: MarketplaceClient for the backend REST API
//! - `auth`: signed session tokens and the per-request session context
//! - `handlers`/`routes`: the HTTP surface
//!
//! # Listing flow
//!
//! A submission carries a listing draft and the seller's contact rows.
//! Contact rows are condensed into one value per method, the draft is
//! validated for its category (event, travel or other), and the resulting
//! payload is sent to the backend on behalf of the authenticated user.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod client_mock;

// Re-export the main API types for ease of use
pub use auth::{SessionAuth, SessionContext};
pub use client::{MarketplaceApi, MarketplaceClient};
pub use config::ServiceConfig;
pub use error::{AppError, ClientError, ValidationError};
pub use handlers::api::AppState;
pub use models::contact::{ContactEntry, ContactMap, ContactMethod};
pub use models::listing::{ListingCategory, ListingDraft, ListingPayload};
pub use routes::create_router;
pub use services::contact_info::normalize;
pub use services::listing_payload::{ListingDefaults, ListingPayloadBuilder};
