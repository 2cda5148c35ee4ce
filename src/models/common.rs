use serde::{Deserialize, Serialize};
use serde_json::Value;

// Envelope shared by the marketplace API and this service's own responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

// Body of `POST /sessions`, carrying the token the backend handed out at login
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    pub token: String,
}
