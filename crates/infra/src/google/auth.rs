//! Google credentials loading and access-token management
//!
//! Credentials live in a JSON file (by default a fixed relative path) holding
//! an OAuth client id/secret and a long-lived refresh token. Access tokens
//! are obtained from the token endpoint and cached until shortly before they
//! expire.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use timebridge_domain::{Result, TimebridgeError};
use tokio::sync::Mutex;
use tracing::debug;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Contents of the Google credentials JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl GoogleCredentials {
    /// Load credentials from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TimebridgeError::Auth(format!(
                "cannot read credentials file {}: {e}",
                path.display()
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            TimebridgeError::Auth(format!("invalid credentials file {}: {e}", path.display()))
        })
    }
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Caches access tokens and refreshes them via the token endpoint.
pub struct TokenManager {
    http: Client,
    credentials: GoogleCredentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(credentials: GoogleCredentials) -> Self {
        Self { http: Client::new(), credentials, cached: Mutex::new(None) }
    }

    /// Return a valid access token, refreshing if expired.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Utc::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let refreshed = self.refresh().await?;
        let expires_at =
            Utc::now() + Duration::seconds((refreshed.expires_in - EXPIRY_MARGIN_SECS).max(0));
        let token = CachedToken { access_token: refreshed.access_token, expires_at };
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    async fn refresh(&self) -> Result<TokenResponse> {
        debug!("refreshing Google access token");

        let response = self
            .http
            .post(&self.credentials.token_uri)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| TimebridgeError::Auth(format!("token refresh request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(TimebridgeError::Auth(format!("token refresh failed ({status}): {text}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| TimebridgeError::Auth(format!("failed to parse token response: {e}")))
    }
}
