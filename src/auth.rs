use axum::http::{header, HeaderMap};
use base64::engine::{general_purpose, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::AuthError;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Who is behind a request, passed explicitly to the handlers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub is_authenticated: bool,
    pub user_id: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Issues and verifies signed session tokens.
///
/// A token reads `{user_id}.{issued_at}.{nonce}.{signature}` where the
/// signature is the base64 of the hex HMAC-SHA256 of
/// `"{user_id}\n{issued_at}\n{nonce}"`.
#[derive(Clone)]
pub struct SessionAuth {
    secret: String,
    ttl: Duration,
}

impl SessionAuth {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            secret: secret.to_string(),
            ttl,
        }
    }

    /// Generate a random nonce for a new token
    pub fn generate_nonce() -> String {
        rand::thread_rng().gen_range(10000000..99999999).to_string()
    }

    /// Get current timestamp for token issue time
    pub fn get_timestamp() -> i64 {
        Utc::now().timestamp()
    }

    // HMAC accepts keys of any length
    fn token_mac(
        secret: &str,
        user_id: &str,
        issued_at: i64,
        nonce: &str,
    ) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(format!("{}\n{}\n{}", user_id, issued_at, nonce).as_bytes());
        Some(mac)
    }

    /// Sign the token fields with the session secret
    pub fn generate_signature(secret: &str, user_id: &str, issued_at: i64, nonce: &str) -> String {
        match Self::token_mac(secret, user_id, issued_at, nonce) {
            Some(mac) => {
                let hex_hash = hex::encode(mac.finalize().into_bytes());
                general_purpose::STANDARD.encode(hex_hash.as_bytes())
            }
            None => String::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: &str) -> String {
        self.issue_at(user_id, Self::get_timestamp())
    }

    fn issue_at(&self, user_id: &str, issued_at: i64) -> String {
        let nonce = Self::generate_nonce();
        let signature = Self::generate_signature(&self.secret, user_id, issued_at, &nonce);
        format!("{}.{}.{}.{}", user_id, issued_at, nonce, signature)
    }

    pub fn verify(&self, token: &str) -> Result<SessionContext, AuthError> {
        // Base64 signatures never contain '.', user ids might
        let mut parts = token.rsplitn(4, '.');
        let signature = parts.next().ok_or(AuthError::MalformedToken)?;
        let nonce = parts.next().ok_or(AuthError::MalformedToken)?;
        let issued_at = parts
            .next()
            .and_then(|ts| ts.parse::<i64>().ok())
            .ok_or(AuthError::MalformedToken)?;
        let user_id = parts
            .next()
            .filter(|id| !id.is_empty())
            .ok_or(AuthError::MalformedToken)?;

        // Undo the base64 and hex layers so the tag is compared in constant time
        let tag = general_purpose::STANDARD
            .decode(signature)
            .ok()
            .and_then(|hex_hash| hex::decode(hex_hash).ok())
            .ok_or(AuthError::InvalidSignature)?;
        Self::token_mac(&self.secret, user_id, issued_at, nonce)
            .ok_or(AuthError::InvalidSignature)?
            .verify_slice(&tag)
            .map_err(|_| AuthError::InvalidSignature)?;

        let now = Self::get_timestamp();
        if issued_at > now || now - issued_at > self.ttl.num_seconds() {
            return Err(AuthError::Expired);
        }

        Ok(SessionContext {
            is_authenticated: true,
            user_id: Some(user_id.to_string()),
        })
    }

    /// Resolve the session from an `Authorization: Bearer` header.
    /// Any problem leaves the caller anonymous.
    pub fn context_from_headers(&self, headers: &HeaderMap) -> SessionContext {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        let Some(token) = token else {
            debug!("{}", AuthError::MissingToken);
            return SessionContext::anonymous();
        };

        match self.verify(token) {
            Ok(session) => {
                debug!("Authenticated session for user {:?}", session.user_id);
                session
            }
            Err(err) => {
                warn!("Rejected session token: {}", err);
                SessionContext::anonymous()
            }
        }
    }
}
