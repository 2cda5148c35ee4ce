use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::models::common::ApiResponse;
use crate::models::listing::ListingPayload;
use crate::models::request::{ContactRequestPayload, ListingModule};

/// Header carrying the user a forwarded call is made for
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Operations the marketplace REST backend offers this service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Resolve the user behind a backend login token
    async fn current_user(&self, backend_token: &str) -> Result<ApiResponse, ClientError>;

    async fn create_listing(
        &self,
        user_id: &str,
        payload: &ListingPayload,
    ) -> Result<ApiResponse, ClientError>;

    async fn update_listing(
        &self,
        user_id: &str,
        listing_id: &str,
        payload: &ListingPayload,
    ) -> Result<ApiResponse, ClientError>;

    async fn send_contact_request(
        &self,
        user_id: &str,
        module: ListingModule,
        listing_id: &str,
        payload: &ContactRequestPayload,
    ) -> Result<ApiResponse, ClientError>;
}

/// Client for the marketplace REST API.
///
/// Forwarded calls authenticate with the service API key and name the
/// acting user in `X-User-Id`. Only `current_user` sends a user's own token.
pub struct MarketplaceClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl MarketplaceClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    // Attach the service credential for a call made on behalf of `user_id`
    fn on_behalf_of(&self, request: RequestBuilder, user_id: &str) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header(USER_ID_HEADER, user_id)
    }

    // Send a request and unwrap the `{ success, data, message }` envelope
    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse, ClientError> {
        let res = request
            .header("Content-Type", "application/json")
            .send()
            .await?;
        info!("Response received with status: {}", res.status());

        let response = res.json::<ApiResponse>().await?;
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Request failed".to_string());
            warn!("Marketplace API rejected request: {}", message);
            return Err(ClientError::Rejected(message));
        }

        Ok(response)
    }
}

#[async_trait]
impl MarketplaceApi for MarketplaceClient {
    async fn current_user(&self, backend_token: &str) -> Result<ApiResponse, ClientError> {
        let url = self.url("/api/auth/me");

        info!("Making request to resolve session user");
        debug!("API URL: {}", url);

        self.send(self.client.get(&url).bearer_auth(backend_token))
            .await
    }

    async fn create_listing(
        &self,
        user_id: &str,
        payload: &ListingPayload,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(ListingModule::Tickets.resource_path());

        info!("Making request to create {} listing", payload.category);
        debug!("API URL: {}", url);

        let request = self.client.post(&url).json(payload);
        self.send(self.on_behalf_of(request, user_id)).await
    }

    async fn update_listing(
        &self,
        user_id: &str,
        listing_id: &str,
        payload: &ListingPayload,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(&format!(
            "{}/{}",
            ListingModule::Tickets.resource_path(),
            listing_id
        ));

        info!("Making request to update listing {}", listing_id);
        debug!("API URL: {}", url);

        let request = self.client.put(&url).json(payload);
        self.send(self.on_behalf_of(request, user_id)).await
    }

    async fn send_contact_request(
        &self,
        user_id: &str,
        module: ListingModule,
        listing_id: &str,
        payload: &ContactRequestPayload,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(&format!(
            "{}/{}/requests",
            module.resource_path(),
            listing_id
        ));

        info!("Making request to contact {} listing {}", module, listing_id);
        debug!("API URL: {}", url);

        let request = self.client.post(&url).json(payload);
        self.send(self.on_behalf_of(request, user_id)).await
    }
}
