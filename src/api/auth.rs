//! Authentication endpoints
//!
//! Login is an OAuth2 password-grant style form post; the returned access
//! token is stored on the client and attached to every subsequent request.

use serde::{Deserialize, Serialize};

use crate::api::{handle_json, ApiClient};
use crate::error::{Error, Result};

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_role: String,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl ApiClient {
    /// Log in with email and password, storing the returned bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let response = self
            .post("/users/login")
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 {
            let body = response.text().await.unwrap_or_default();
            let detail = match super::api_error(status, body) {
                Error::Api { detail, .. } => detail,
                _ => "invalid credentials".to_string(),
            };
            return Err(Error::Unauthorized(detail));
        }

        let auth: AuthResponse = if status.is_success() {
            response.json().await?
        } else {
            return Err(super::api_error(
                status,
                response.text().await.unwrap_or_default(),
            ));
        };

        self.set_token(&auth.access_token);
        tracing::info!(user = %auth.user_name, "logged in");
        Ok(auth)
    }

    /// Notify the backend and drop the stored token. The server call is
    /// best-effort: the token is cleared even when it fails.
    pub async fn logout(&self) {
        if self.is_authenticated() {
            if let Err(err) = self.post("/users/logout").send().await {
                tracing::debug!(error = %err, "logout request failed");
            }
        }
        self.clear_token();
        tracing::info!("logged out");
    }

    /// Fetch the profile of the currently authenticated user.
    pub async fn current_user(&self) -> Result<UserProfile> {
        if !self.is_authenticated() {
            return Err(Error::Unauthorized("not logged in".to_string()));
        }
        let response = self.get("/users/me").send().await?;
        handle_json(response).await
    }
}
