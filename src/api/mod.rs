//! REST client for the collections backend API
//!
//! One `ApiClient` per session: it owns the base URL, the reqwest client, and
//! the bearer token captured at login. Endpoint groups live in the submodules,
//! mirroring the backend's route families.

pub mod applications;
pub mod approvals;
pub mod auth;
pub mod comments;
pub mod filters;
pub mod months;
pub mod payments;
pub mod status;

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};

/// HTTP client for the collections backend.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Build a client against an explicit base URL with default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut config = Config::default();
        config.api_base_url = base_url.into();
        Self::new(&config)
    }

    /// Store the bearer token attached to all subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("token lock poisoned") = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authed(self.http.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authed(self.http.post(self.url(path)))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.authed(self.http.put(self.url(path)))
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.read().expect("token lock poisoned").as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Decode a response, mapping non-2xx statuses to `Error::Api` with the
/// backend's `detail`/`message` when the body carries one.
pub(crate) async fn handle_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(api_error(status, response.text().await.unwrap_or_default()))
}

/// Build the API error for a non-2xx response body.
pub(crate) fn api_error(status: StatusCode, body: String) -> Error {
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .or_else(|| value.get("message"))
                .and_then(|d| d.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });
    Error::Api {
        status: status.as_u16(),
        detail,
    }
}
