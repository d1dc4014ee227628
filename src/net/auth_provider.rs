//! Client for the hosted auth provider that owns the browser session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend issues tokens, but the session that survives page reloads is
//! the provider's: a JSON record in local storage that later visits restore.
//! Installing a backend-issued token here is the second half of sign-in.
//! Candidate self-registration and email code verification also go straight
//! to the provider.
//!
//! ERROR HANDLING
//! ==============
//! Remote operations fail with `NotConfigured` when the build carried no
//! provider URL/key. Local record handling works regardless, and `clear`
//! never fails so sign-out always completes.

#[cfg(test)]
#[path = "auth_provider_test.rs"]
mod auth_provider_test;

use super::error::{ProviderError, detail_or_generic};
use super::transport::{HttpRequest, HttpResponse, Transport, join_url};
use super::types::{ProviderGrant, ProviderUser, Role, Session};
use crate::config::ProviderEndpoint;
use crate::util::storage::KeyValueStore;

pub const SESSION_STORAGE_KEY: &str = "recruit_portal.session";

const USER_PATH: &str = "/auth/v1/user";
const REFRESH_PATH: &str = "/auth/v1/token?grant_type=refresh_token";
const LOGOUT_PATH: &str = "/auth/v1/logout";
const SIGNUP_PATH: &str = "/auth/v1/signup";
const VERIFY_PATH: &str = "/auth/v1/verify";

#[derive(Clone, Debug)]
pub struct AuthProvider<T, S> {
    endpoint: Option<ProviderEndpoint>,
    transport: T,
    storage: S,
}

impl<T: Transport, S: KeyValueStore> AuthProvider<T, S> {
    pub fn new(endpoint: Option<ProviderEndpoint>, transport: T, storage: S) -> Self {
        Self { endpoint, transport, storage }
    }

    /// Read the persisted session record.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Decode`] for an unreadable record, which is
    /// removed so the next visit starts clean.
    pub fn load_persisted(&self) -> Result<Option<Session>, ProviderError> {
        let Some(raw) = self.storage.get(SESSION_STORAGE_KEY) else {
            return Ok(None);
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                self.forget();
                Err(ProviderError::Decode(e.to_string()))
            }
        }
    }

    /// Validate a server-issued token with the provider, then persist it as
    /// the local session.
    ///
    /// # Errors
    ///
    /// Fails when the provider is unconfigured, unreachable, rejects the
    /// token, or the record cannot be written. Nothing is persisted then.
    pub async fn install(&self, session: &Session) -> Result<(), ProviderError> {
        self.fetch_user(&session.access_token).await?;
        self.persist(session)
    }

    /// Trade a refresh token for a new session and persist it.
    ///
    /// # Errors
    ///
    /// Fails on the same conditions as [`install`](Self::install), or when
    /// the grant cannot be decoded.
    pub async fn refresh(&self, refresh_token: &str, now: i64) -> Result<Session, ProviderError> {
        let endpoint = self.endpoint()?;
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let request = with_api_key(endpoint, HttpRequest::post(join_url(&endpoint.url, REFRESH_PATH), body));
        let response = self.transport.send(request).await?;
        check_status(&response)?;
        let grant: ProviderGrant = response.json().map_err(|e| ProviderError::Decode(e.to_string()))?;
        let session = Session::from_provider(grant, now);
        self.persist(&session)?;
        Ok(session)
    }

    /// Remove the local record without contacting the provider.
    pub fn forget(&self) {
        self.storage.remove(SESSION_STORAGE_KEY);
    }

    /// Remove the local record, then revoke `access_token` remotely if given.
    /// Remote failures are logged and otherwise ignored.
    pub async fn clear(&self, access_token: Option<&str>) {
        self.forget();
        let (Some(token), Some(endpoint)) = (access_token, self.endpoint.as_ref()) else {
            return;
        };
        let request =
            with_api_key(endpoint, HttpRequest::post(join_url(&endpoint.url, LOGOUT_PATH), serde_json::json!({})))
                .bearer(token);
        match self.transport.send(request).await {
            Ok(resp) if resp.is_success() => {}
            Ok(resp) => leptos::logging::warn!("remote sign-out returned {}", resp.status),
            Err(e) => leptos::logging::warn!("remote sign-out failed: {e}"),
        }
    }

    /// Create a candidate account. The provider emails a confirmation code.
    ///
    /// # Errors
    ///
    /// Fails when the provider is unconfigured, unreachable, or refuses the signup.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let endpoint = self.endpoint()?;
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "role": Role::Candidate.as_str() },
        });
        let request = with_api_key(endpoint, HttpRequest::post(join_url(&endpoint.url, SIGNUP_PATH), body));
        let response = self.transport.send(request).await?;
        check_status(&response)
    }

    /// Confirm a signup with the emailed one-time code.
    ///
    /// # Errors
    ///
    /// Fails when the provider is unconfigured, unreachable, or the code is
    /// invalid or expired.
    pub async fn verify_signup(&self, email: &str, code: &str) -> Result<(), ProviderError> {
        let endpoint = self.endpoint()?;
        let body = serde_json::json!({ "type": "signup", "email": email, "token": code });
        let request = with_api_key(endpoint, HttpRequest::post(join_url(&endpoint.url, VERIFY_PATH), body));
        let response = self.transport.send(request).await?;
        check_status(&response)
    }

    /// Fetch the provider's view of the token's user.
    ///
    /// # Errors
    ///
    /// Fails when unconfigured, unreachable, rejected, or undecodable.
    pub async fn fetch_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let endpoint = self.endpoint()?;
        let request = with_api_key(endpoint, HttpRequest::get(join_url(&endpoint.url, USER_PATH))).bearer(access_token);
        let response = self.transport.send(request).await?;
        check_status(&response)?;
        response.json().map_err(|e| ProviderError::Decode(e.to_string()))
    }

    fn endpoint(&self) -> Result<&ProviderEndpoint, ProviderError> {
        self.endpoint.as_ref().ok_or(ProviderError::NotConfigured)
    }

    /// Write `session` as the local record.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Storage`] when the record cannot be written.
    pub fn persist(&self, session: &Session) -> Result<(), ProviderError> {
        let raw = serde_json::to_string(session).map_err(|e| ProviderError::Storage(e.to_string()))?;
        self.storage.set(SESSION_STORAGE_KEY, &raw).map_err(ProviderError::Storage)
    }
}

fn with_api_key(endpoint: &ProviderEndpoint, request: HttpRequest) -> HttpRequest {
    request.header("apikey", &endpoint.api_key)
}

fn check_status(response: &HttpResponse) -> Result<(), ProviderError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(ProviderError::Rejected { status: response.status, message: detail_or_generic(&response.body) })
    }
}
