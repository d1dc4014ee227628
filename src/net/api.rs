//! Authenticated REST client for page code.
//!
//! Every request carries `Authorization: Bearer <access_token>` while a
//! session exists.
//!
//! ERROR HANDLING
//! ==============
//! A `401` from any resource endpoint means the backend no longer accepts
//! the token it was sent. If that token is still the session's, the client
//! signs the store out before returning
//! [`ApiError::Unauthorized`]; the route guard then sends the user to
//! `/login`. Nothing is retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, detail_message};
use super::transport::{FetchTransport, HttpRequest, HttpResponse, Method, Transport, join_url};
use crate::state::session_store::SessionStore;
use crate::util::storage::{KeyValueStore, LocalStorage};

pub type BrowserApiClient = ApiClient<FetchTransport, LocalStorage>;

pub const UNAUTHORIZED_STATUS: u16 = 401;

#[derive(Clone)]
pub struct ApiClient<T, S> {
    base_url: String,
    transport: T,
    session: SessionStore<T, S>,
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(base_url: &str, transport: T, session: SessionStore<T, S>) -> Self {
        Self { base_url: base_url.to_owned(), transport, session }
    }

    /// `GET path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; a `401` also signs the session out.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.execute(HttpRequest::new(Method::Get, self.url(path))).await?;
        decode(&response)
    }

    /// `POST path` with a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; a `401` also signs the session out.
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let request = HttpRequest::new(Method::Post, self.url(path)).json(encode(body)?);
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// `PUT path` with a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; a `401` also signs the session out.
    pub async fn put_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let request = HttpRequest::new(Method::Put, self.url(path)).json(encode(body)?);
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// `DELETE path`, ignoring any reply body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; a `401` also signs the session out.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(HttpRequest::new(Method::Delete, self.url(path))).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let token = self.session.access_token();
        let request = match token.as_deref() {
            Some(token) => request.bearer(token),
            None => request,
        };
        let response = self.transport.send(request).await?;
        if response.status == UNAUTHORIZED_STATUS {
            if let Some(token) = token {
                self.session.expire(&token).await;
            }
            return Err(ApiError::Unauthorized);
        }
        if !response.is_success() {
            return Err(status_error(&response));
        }
        Ok(response)
    }
}

fn status_error(response: &HttpResponse) -> ApiError {
    let status = response.status;
    let message = detail_message(&response.body).unwrap_or_else(|| format!("request failed: {status}"));
    ApiError::Status { status, message }
}

fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApiError> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}
