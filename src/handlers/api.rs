use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Json as ExtractJson, Path, State,
    },
    http::HeaderMap,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::{SessionAuth, SessionContext};
use crate::client::MarketplaceApi;
use crate::error::{AppError, ClientError};
use crate::models::common::{ApiResponse, SessionRequest};
use crate::models::listing::{ListingPayload, ListingSubmission};
use crate::models::request::{ContactRequestDraft, ListingModule};
use crate::services::contact_info::normalize;
use crate::services::contact_request::compose;
use crate::services::listing_payload::ListingPayloadBuilder;

pub const LOGIN_TO_LIST: &str = "Please log in to create a listing";
pub const LOGIN_TO_REQUEST: &str = "Please log in to send a request";
pub const LOGIN_FAILED: &str = "Login failed";

// AppState struct containing shared resources
pub struct AppState {
    pub api: Arc<dyn MarketplaceApi>,
    pub sessions: SessionAuth,
    pub builder: ListingPayloadBuilder,
}

// Body and path rejections are held back until the session is checked, so
// anonymous callers always see the login message first
type JsonBody<T> = Result<ExtractJson<T>, JsonRejection>;
type PathParams<T> = Result<Path<T>, PathRejection>;

// Only authenticated sessions may reach the payload builders
fn require_session(session: &SessionContext, message: &'static str) -> Result<String, AppError> {
    match (session.is_authenticated, session.user_id.as_deref()) {
        (true, Some(user_id)) => Ok(user_id.to_string()),
        _ => {
            warn!("Refusing unauthenticated request: {}", message);
            Err(AppError::Unauthenticated(message))
        }
    }
}

fn build_payload(
    state: &AppState,
    submission: &ListingSubmission,
) -> Result<ListingPayload, AppError> {
    let contacts = normalize(&submission.contacts);

    state
        .builder
        .build(&submission.draft, &contacts)
        .map_err(|err| {
            warn!(
                "Rejected {} listing '{}': {}",
                submission.draft.category, submission.draft.title, err
            );
            AppError::from(err)
        })
}

// The backend answers `/api/auth/me` with the user record in `data`
fn user_id_from(response: &ApiResponse) -> Option<String> {
    match response.data.as_ref()?.get("id")? {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

// Session endpoint: exchange a backend login token for a service session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: JsonBody<SessionRequest>,
) -> Result<Json<ApiResponse>, AppError> {
    let ExtractJson(request) = body?;
    info!("Received request to open a session");

    let response = match state.api.current_user(request.token.trim()).await {
        Ok(response) => response,
        Err(ClientError::Rejected(message)) => {
            warn!("Backend refused login token: {}", message);
            return Err(AppError::LoginFailed(LOGIN_FAILED.to_string()));
        }
        Err(err) => {
            error!("Failed to resolve session user: {}", err);
            return Err(err.into());
        }
    };

    let Some(user_id) = user_id_from(&response) else {
        warn!("Backend user record carried no id");
        return Err(AppError::LoginFailed(LOGIN_FAILED.to_string()));
    };

    let token = state.sessions.issue(&user_id);
    info!("Opened session for user {}", user_id);

    Ok(Json(ApiResponse::ok(json!({
        "token": token,
        "user_id": user_id,
        "expires_in": state.sessions.ttl().num_seconds(),
    }))))
}

// Create listing endpoint
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: JsonBody<ListingSubmission>,
) -> Result<Json<ApiResponse>, AppError> {
    let session = state.sessions.context_from_headers(&headers);
    let user_id = require_session(&session, LOGIN_TO_LIST)?;
    let ExtractJson(submission) = body?;

    info!(
        "Received request to create {} listing: {}",
        submission.draft.category, submission.draft.title
    );

    let payload = build_payload(&state, &submission)?;

    match state.api.create_listing(&user_id, &payload).await {
        Ok(response) => {
            info!("Successfully created listing '{}'", payload.title);
            Ok(Json(response))
        }
        Err(err) => {
            error!("Failed to create listing: {}", err);
            Err(err.into())
        }
    }
}

// Update listing endpoint
pub async fn update_listing(
    State(state): State<Arc<AppState>>,
    path: PathParams<String>,
    headers: HeaderMap,
    body: JsonBody<ListingSubmission>,
) -> Result<Json<ApiResponse>, AppError> {
    let session = state.sessions.context_from_headers(&headers);
    let user_id = require_session(&session, LOGIN_TO_LIST)?;
    let Path(listing_id) = path?;
    let ExtractJson(submission) = body?;

    info!("Received request to update listing: {}", listing_id);

    let payload = build_payload(&state, &submission)?;

    match state.api.update_listing(&user_id, &listing_id, &payload).await {
        Ok(response) => {
            info!("Successfully updated listing {}", listing_id);
            Ok(Json(response))
        }
        Err(err) => {
            error!("Failed to update listing {}: {}", listing_id, err);
            Err(err.into())
        }
    }
}

// Contact request endpoint behind every module's request button
pub async fn send_contact_request(
    State(state): State<Arc<AppState>>,
    path: PathParams<(ListingModule, String)>,
    headers: HeaderMap,
    body: JsonBody<ContactRequestDraft>,
) -> Result<Json<ApiResponse>, AppError> {
    let session = state.sessions.context_from_headers(&headers);
    let user_id = require_session(&session, LOGIN_TO_REQUEST)?;
    let Path((module, listing_id)) = path?;
    let ExtractJson(draft) = body?;

    info!("Received contact request for {} listing: {}", module, listing_id);

    let payload = compose(&draft).map_err(|err| {
        warn!("Rejected contact request for {}: {}", listing_id, err);
        AppError::from(err)
    })?;

    match state
        .api
        .send_contact_request(&user_id, module, &listing_id, &payload)
        .await
    {
        Ok(response) => {
            info!("Successfully sent contact request for {} {}", module, listing_id);
            Ok(Json(response))
        }
        Err(err) => {
            error!("Failed to send contact request: {}", err);
            Err(err.into())
        }
    }
}

// Build a payload without forwarding it, for checking form wiring
pub async fn preview_listing(
    State(state): State<Arc<AppState>>,
    body: JsonBody<ListingSubmission>,
) -> Result<Json<ListingPayload>, AppError> {
    let ExtractJson(submission) = body?;

    info!(
        "Received request to preview {} listing: {}",
        submission.draft.category, submission.draft.title
    );

    let payload = build_payload(&state, &submission)?;
    Ok(Json(payload))
}
