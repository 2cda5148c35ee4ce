use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::MockMarketplaceApi;
use crate::error::ClientError;
use crate::models::common::ApiResponse;
use crate::models::listing::ListingPayload;
use crate::models::request::{ContactRequestPayload, ListingModule};

/// Backend login token the mock accepts for `user_id`
pub fn backend_token_for(user_id: &str) -> String {
    format!("backend-{}", user_id)
}

// A contact request as the mock backend received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub module: ListingModule,
    pub listing_id: String,
    pub payload: ContactRequestPayload,
}

// A simple in-memory stand-in for the marketplace backend
pub struct MockDataStore {
    listings: Mutex<HashMap<String, ListingPayload>>,
    requests: Mutex<Vec<RecordedRequest>>,
    acting_users: Mutex<Vec<String>>,
}

impl MockDataStore {
    pub fn new() -> Self {
        Self {
            listings: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            acting_users: Mutex::new(Vec::new()),
        }
    }

    pub fn store_listing(&self, listing_id: String, payload: ListingPayload) {
        let mut listings = self.listings.lock().unwrap();
        listings.insert(listing_id, payload);
    }

    pub fn get_listing(&self, listing_id: &str) -> Option<ListingPayload> {
        let listings = self.listings.lock().unwrap();
        listings.get(listing_id).cloned()
    }

    pub fn listing_count(&self) -> usize {
        self.listings.lock().unwrap().len()
    }

    pub fn record_request(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn record_user(&self, user_id: &str) {
        self.acting_users.lock().unwrap().push(user_id.to_string());
    }

    pub fn acting_users(&self) -> Vec<String> {
        self.acting_users.lock().unwrap().clone()
    }
}

// Helper function to set up a mock API with predefined behavior
pub fn setup_mock_api() -> (MockMarketplaceApi, Arc<MockDataStore>) {
    let data_store = Arc::new(MockDataStore::new());
    let data_store_clone = Arc::clone(&data_store);

    let mut mock_api = MockMarketplaceApi::new();

    // Mock current_user, only tokens minted by backend_token_for resolve
    mock_api
        .expect_current_user()
        .returning(|backend_token| match backend_token.strip_prefix("backend-") {
            Some(user_id) if !user_id.is_empty() => {
                Ok(ApiResponse::ok(json!({ "id": user_id, "name": "Test Student" })))
            }
            _ => Err(ClientError::Rejected("Invalid or expired token".to_string())),
        });

    // Mock create_listing
    let store_ref1 = Arc::clone(&data_store);
    mock_api
        .expect_create_listing()
        .returning(move |user_id, payload| {
            let listing_id = format!("listing_{}", store_ref1.listing_count() + 1);
            store_ref1.record_user(user_id);
            store_ref1.store_listing(listing_id.clone(), payload.clone());

            Ok(ApiResponse::ok(json!({ "id": listing_id, "title": payload.title })))
        });

    // Mock update_listing, unknown ids are rejected like the backend does
    let store_ref2 = Arc::clone(&data_store);
    mock_api
        .expect_update_listing()
        .returning(move |user_id, listing_id, payload| {
            store_ref2.record_user(user_id);
            if store_ref2.get_listing(listing_id).is_none() {
                return Err(ClientError::Rejected("Listing not found".to_string()));
            }
            store_ref2.store_listing(listing_id.to_string(), payload.clone());

            Ok(ApiResponse::ok(json!({ "id": listing_id })))
        });

    // Mock send_contact_request
    let store_ref3 = Arc::clone(&data_store);
    mock_api
        .expect_send_contact_request()
        .returning(move |user_id, module, listing_id, payload| {
            store_ref3.record_user(user_id);
            store_ref3.record_request(RecordedRequest {
                module,
                listing_id: listing_id.to_string(),
                payload: payload.clone(),
            });

            Ok(ApiResponse {
                success: true,
                data: None,
                message: Some("Request sent".to_string()),
            })
        });

    (mock_api, data_store_clone)
}
