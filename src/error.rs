use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::common::ApiResponse;

/// A listing or request draft broke one of the submit rules.
///
/// The display text is what the form shows the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title required")]
    TitleRequired,

    #[error("valid price required")]
    InvalidPrice,

    #[error("valid quantity required")]
    InvalidQuantity,

    #[error("{0} required")]
    MissingField(&'static str),

    #[error("valid {0} required")]
    InvalidField(&'static str),

    #[error("at least one contact method required")]
    ContactRequired,

    #[error("message required")]
    MessageRequired,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Rejected(String),

    #[error("Marketplace API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing session token")]
    MissingToken,

    #[error("Malformed session token")]
    MalformedToken,

    #[error("Invalid session signature")]
    InvalidSignature,

    #[error("Session expired")]
    Expired,
}

// Errors a handler can answer with
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("{0}")]
    LoginFailed(String),

    #[error("{0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] ClientError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Unauthenticated(_) | AppError::LoginFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::MalformedRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}
