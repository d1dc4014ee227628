//! Failure taxonomy for sign-in, the auth provider, and REST calls.
//!
//! ERROR HANDLING
//! ==============
//! `Display` strings are what the UI shows, so server-supplied messages pass
//! through verbatim and only system failures get a prefix.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::transport::TransportError;

/// Fallback when the server gave no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("auth provider is not configured")]
    NotConfigured,

    #[error("auth provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected auth provider response: {0}")]
    Decode(String),

    #[error("session storage unavailable: {0}")]
    Storage(String),
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        Self::Request(err.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend refused the credentials; carries its message.
    #[error("{0}")]
    Rejected(String),

    #[error("login request failed: {0}")]
    Network(String),

    #[error("unexpected login response: {0}")]
    Decode(String),

    /// The backend accepted the login but the local session could not be established.
    #[error("Failed to sync session: {0}")]
    SessionSync(#[from] ProviderError),
}

impl AuthError {
    /// `false` for user-input errors (bad credentials), `true` for everything else.
    pub fn is_system(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the bearer token; the session has been dropped.
    #[error("session expired, sign in again")]
    Unauthorized,

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Pull a human-readable message out of an error body.
///
/// Understands the backend's `detail` (a string, or a validation list whose
/// first entry has a `msg`) and the auth provider's `msg`, `message`,
/// `error_description` fields.
pub fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = match value.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.as_str()),
        Some(serde_json::Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(serde_json::Value::as_str),
        _ => None,
    };
    detail
        .or_else(|| ["message", "msg", "error_description"].iter().find_map(|key| value.get(*key)?.as_str()))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_owned)
}

/// [`detail_message`] with the generic fallback.
pub fn detail_or_generic(body: &str) -> String {
    detail_message(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned())
}
