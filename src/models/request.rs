use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::contact::{ContactEntry, ContactMap};

/// Marketplace sections a contact request can target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ListingModule {
    Rooms,
    Marketplace,
    Tickets,
    LostFound,
    Rides,
}

impl ListingModule {
    pub const ALL: [ListingModule; 5] = [
        ListingModule::Rooms,
        ListingModule::Marketplace,
        ListingModule::Tickets,
        ListingModule::LostFound,
        ListingModule::Rides,
    ];

    /// Backend collection path for this module
    pub fn resource_path(&self) -> &'static str {
        match self {
            ListingModule::Rooms => "/api/rooms",
            ListingModule::Marketplace => "/api/marketplace",
            ListingModule::Tickets => "/api/tickets",
            ListingModule::LostFound => "/api/lost-found",
            ListingModule::Rides => "/api/rides",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingModule::Rooms => "rooms",
            ListingModule::Marketplace => "marketplace",
            ListingModule::Tickets => "tickets",
            ListingModule::LostFound => "lost-found",
            ListingModule::Rides => "rides",
        }
    }
}

impl fmt::Display for ListingModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// What a buyer fills in behind a request button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequestDraft {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub contacts: Vec<ContactEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactRequestPayload {
    pub message: String,
    pub contact_info: ContactMap,
}
