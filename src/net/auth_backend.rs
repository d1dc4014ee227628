//! Backend half of sign-in: `POST /auth/login`.
//!
//! The backend verifies the credentials and answers with the token pair
//! and the user's role. It does not establish anything on the client; that
//! is the auth provider's job (see `auth_provider`).

#[cfg(test)]
#[path = "auth_backend_test.rs"]
mod auth_backend_test;

use super::error::{AuthError, detail_or_generic};
use super::transport::{HttpRequest, Transport, join_url};
use super::types::{Credentials, LoginGrant};

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Clone, Debug)]
pub struct AuthBackend<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> AuthBackend<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self { base_url: base_url.to_owned(), transport }
    }

    /// Exchange credentials for a token grant.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Rejected`] with the server's message on a non-2xx answer
    /// - [`AuthError::Network`] when no response arrived
    /// - [`AuthError::Decode`] when a 2xx body is not a grant
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let body = serde_json::to_value(credentials).map_err(|e| AuthError::Decode(e.to_string()))?;
        let request = HttpRequest::post(join_url(&self.base_url, LOGIN_PATH), body);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        if !response.is_success() {
            return Err(AuthError::Rejected(detail_or_generic(&response.body)));
        }
        response.json::<LoginGrant>().map_err(|e| AuthError::Decode(e.to_string()))
    }
}
