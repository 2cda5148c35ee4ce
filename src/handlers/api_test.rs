#[cfg(test)]
mod api_tests {
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use chrono::Duration;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::auth::SessionAuth;
    use crate::client::{MarketplaceClient, MockMarketplaceApi};
    use crate::client_mock::{backend_token_for, setup_mock_api, MockDataStore};
    use crate::error::ClientError;
    use crate::handlers::api::AppState;
    use crate::handlers::test::{sample_event, sample_other, sample_travel};
    use crate::models::common::ApiResponse;
    use crate::models::request::ListingModule;
    use crate::routes::create_router;
    use crate::services::listing_payload::ListingPayloadBuilder;

    fn sessions() -> SessionAuth {
        SessionAuth::new("api_test_secret", Duration::hours(1))
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    // Helper function to set up a test server with mock dependencies
    fn setup_test_server(is_production: bool) -> (TestServer, Arc<MockDataStore>, String) {
        let (mock_api, data_store) = setup_mock_api();
        let sessions = sessions();
        let token = sessions.issue("student-1");

        let app_state = Arc::new(AppState {
            api: Arc::new(mock_api),
            sessions,
            builder: ListingPayloadBuilder::default(),
        });

        let server = TestServer::new(create_router(app_state, is_production)).unwrap();
        (server, data_store, token)
    }

    fn server_with(mock_api: MockMarketplaceApi, sessions: SessionAuth) -> TestServer {
        let app_state = Arc::new(AppState {
            api: Arc::new(mock_api),
            sessions,
            builder: ListingPayloadBuilder::default(),
        });
        TestServer::new(create_router(app_state, false)).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _, _) = setup_test_server(true);

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "OK");
    }

    #[tokio::test]
    async fn test_create_event_listing() {
        let (server, store, token) = setup_test_server(false);

        let response = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&sample_event())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["id"], json!("listing_1"));

        let stored = store.get_listing("listing_1").unwrap();
        assert_eq!(stored.event_date, "2025-12-01T19:30:00.000Z");
        assert_eq!(stored.contact_info.get("mobile"), Some("9999999999"));
        assert_eq!(store.acting_users(), vec!["student-1".to_string()]);
    }

    #[tokio::test]
    async fn test_create_listing_requires_login() {
        let (server, store, _) = setup_test_server(false);

        let response = server
            .post("/listings")
            .json(&sample_event())
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Please log in to create a listing"));
        assert_eq!(store.listing_count(), 0);
    }

    #[tokio::test]
    async fn test_create_listing_rejects_forged_token() {
        let (server, store, _) = setup_test_server(false);
        let forged = SessionAuth::new("someone_else", Duration::hours(1)).issue("student-1");

        let response = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&forged))
            .json(&sample_travel())
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.listing_count(), 0);
    }

    #[tokio::test]
    async fn test_create_listing_validation_error() {
        let (server, store, token) = setup_test_server(false);
        let mut submission = sample_other();
        submission.contacts.clear();

        let response = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&submission)
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["message"],
            json!("at least one contact method required")
        );
        assert_eq!(store.listing_count(), 0);
    }

    #[tokio::test]
    async fn test_update_listing() {
        let (server, store, token) = setup_test_server(false);

        let created = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&sample_travel())
            .await;
        assert_eq!(created.status_code(), StatusCode::OK);

        let mut submission = sample_travel();
        submission.draft.price = "600".to_string();

        let response = server
            .put("/listings/listing_1")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&submission)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(store.get_listing("listing_1").unwrap().price, 600.0);
    }

    #[tokio::test]
    async fn test_update_unknown_listing_surfaces_backend_message() {
        let (server, _, token) = setup_test_server(false);

        let response = server
            .put("/listings/missing")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&sample_travel())
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["message"], json!("Listing not found"));
    }

    #[tokio::test]
    async fn test_contact_request() {
        let (server, store, token) = setup_test_server(true);

        let response = server
            .post("/lost-found/item-9/requests")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&json!({
                "message": "I think this is my bag",
                "contacts": [
                    { "id": "1", "type": "mobile", "value": "  " },
                    { "id": "2", "type": "email", "value": "owner@campus.edu" }
                ]
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let requests = store.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].module, ListingModule::LostFound);
        assert_eq!(requests[0].listing_id, "item-9");
        assert_eq!(requests[0].payload.contact_info.get("email"), Some("owner@campus.edu"));
        assert_eq!(requests[0].payload.contact_info.get("mobile"), None);
    }

    #[tokio::test]
    async fn test_contact_request_requires_login() {
        let (server, store, _) = setup_test_server(false);

        let response = server
            .post("/rides/ride-1/requests")
            .json(&json!({ "message": "Seat for two?", "contacts": [] }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["message"], json!("Please log in to send a request"));
        assert!(store.requests().is_empty());
    }

    #[tokio::test]
    async fn test_contact_request_unknown_module() {
        let (server, store, token) = setup_test_server(false);

        let response = server
            .post("/housing/1/requests")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&json!({ "message": "Hi" }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(body["message"].as_str().is_some_and(|msg| !msg.is_empty()));
        assert!(store.requests().is_empty());
    }

    #[tokio::test]
    async fn test_contact_request_unknown_module_requires_login_first() {
        let (server, _, _) = setup_test_server(false);

        let response = server
            .post("/housing/1/requests")
            .text("not json")
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["message"], json!("Please log in to send a request"));
    }

    #[tokio::test]
    async fn test_create_listing_malformed_body() {
        let (server, store, token) = setup_test_server(false);

        let response = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&json!({ "draft": { "category": "rooms" } }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(body["message"].as_str().is_some_and(|msg| !msg.is_empty()));
        assert_eq!(store.listing_count(), 0);
    }

    #[tokio::test]
    async fn test_create_listing_malformed_body_requires_login_first() {
        let (server, _, _) = setup_test_server(false);

        let response = server
            .post("/listings")
            .json(&json!({ "draft": { "category": "rooms" } }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Please log in to create a listing"));
    }

    #[tokio::test]
    async fn test_session_login_then_create_listing() {
        let (server, store, _) = setup_test_server(false);

        let response = server
            .post("/sessions")
            .json(&json!({ "token": backend_token_for("student-7") }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["user_id"], json!("student-7"));
        assert_eq!(body["data"]["expires_in"], json!(3600));

        let token = body["data"]["token"].as_str().unwrap().to_string();
        let created = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&sample_event())
            .await;

        assert_eq!(created.status_code(), StatusCode::OK);
        assert_eq!(store.acting_users(), vec!["student-7".to_string()]);
    }

    #[tokio::test]
    async fn test_session_rejects_unknown_backend_token() {
        let (server, _, _) = setup_test_server(false);

        let response = server
            .post("/sessions")
            .json(&json!({ "token": "stolen" }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Login failed"));
    }

    #[tokio::test]
    async fn test_session_without_user_id_fails() {
        let mut mock_api = MockMarketplaceApi::new();
        mock_api
            .expect_current_user()
            .times(1)
            .returning(|_| Ok(ApiResponse::ok(json!({ "name": "Nobody" }))));
        let server = server_with(mock_api, sessions());

        let response = server
            .post("/sessions")
            .json(&json!({ "token": "anything" }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_preview_listing_in_development() {
        let (server, store, _) = setup_test_server(false);

        let response = server.post("/listings/preview").json(&sample_travel()).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["venue"], json!("Mumbai → Pune"));
        assert_eq!(body["location"], json!("Pune"));
        assert_eq!(body["event_type"], json!("travel"));
        assert_eq!(body["price"], json!(550));
        assert_eq!(store.listing_count(), 0);
    }

    #[tokio::test]
    async fn test_dev_routes_hidden_in_production() {
        let (server, _, _) = setup_test_server(true);

        let response = server.get("/listings/samples").expect_failure().await;
        assert!(response.status_code().is_client_error());

        let (server, _, _) = setup_test_server(false);
        let response = server.get("/listings/samples").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["event_example"]["draft"]["category"], json!("event"));
    }

    #[tokio::test]
    async fn test_backend_rejection_surfaces_message() {
        let mut mock_api = MockMarketplaceApi::new();
        mock_api
            .expect_create_listing()
            .times(1)
            .returning(|_, _| Err(ClientError::Rejected("Service unavailable".to_string())));

        let sessions = sessions();
        let token = sessions.issue("student-2");
        let server = server_with(mock_api, sessions);

        let response = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&sample_other())
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["message"], json!("Service unavailable"));
    }

    #[tokio::test]
    async fn test_backend_unreachable_is_bad_gateway() {
        let sessions = sessions();
        let token = sessions.issue("student-3");
        let app_state = Arc::new(AppState {
            // Nothing listens on port 1
            api: Arc::new(MarketplaceClient::new("http://127.0.0.1:1", "service-key")),
            sessions,
            builder: ListingPayloadBuilder::default(),
        });
        let server = TestServer::new(create_router(app_state, false)).unwrap();

        let response = server
            .post("/listings")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&sample_other())
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(body["message"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("Marketplace API request failed")));
    }
}
