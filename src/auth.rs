//! OAuth 2.0 device-code flow against the Yoto login service.
//!
//! Tokens persist through [`ConfigStore`]; the rest of the crate only ever
//! calls [`authenticated_client`], which refreshes behind the scenes when
//! the access token has expired.

use crate::api::YotoClient;
use crate::config::{ConfigError, ConfigStore, StoredTokens};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_LOGIN_URL: &str = "https://login.yotoplay.com";
const DEFAULT_CLIENT_ID: &str = "FtGqXYWpTY0ZxMGE6Sb7";
const API_AUDIENCE: &str = "https://api.yotoplay.com";
const DEVICE_SCOPE: &str = "profile offline_access";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Authorization failed: {0}")]
    Denied(String),
    #[error("Device authorization expired before it was approved")]
    DeviceCodeExpired,
    #[error("Not logged in. Run 'yoto auth login' first")]
    NotLoggedIn,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: String,
    pub expires_in: u64,
    pub interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for the login host (device authorization + token grants).
pub struct AuthClient {
    client: Client,
    base_url: String,
    client_id: String,
}

impl AuthClient {
    pub fn new() -> Self {
        let client_id =
            std::env::var("YOTO_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string());
        Self {
            client: Client::new(),
            base_url: DEFAULT_LOGIN_URL.to_string(),
            client_id,
        }
    }

    pub fn with_base_url(base_url: String, client_id: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            client_id,
        }
    }

    /// Start the device-code flow.
    pub async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        let url = format!("{}/oauth/device/code", self.base_url);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", DEVICE_SCOPE),
                ("audience", API_AUDIENCE),
            ])
            .send()
            .await?;

        Ok(response.error_for_status()?.json().await?)
    }

    /// Poll the token endpoint until the user approves, the code expires,
    /// or the server rejects the authorization outright.
    pub async fn poll_for_token(
        &self,
        device: &DeviceCodeResponse,
    ) -> Result<TokenResponse, AuthError> {
        let url = format!("{}/oauth/token", self.base_url);
        let deadline = Utc::now().timestamp() + device.expires_in as i64;
        let mut interval = device.interval.max(1);

        loop {
            if Utc::now().timestamp() >= deadline {
                return Err(AuthError::DeviceCodeExpired);
            }
            tokio::time::sleep(Duration::from_secs(interval)).await;

            let response = self
                .client
                .post(&url)
                .form(&[
                    ("grant_type", "urn:ietf:params:oauth:grant-type:device_code"),
                    ("device_code", device.device_code.as_str()),
                    ("client_id", self.client_id.as_str()),
                ])
                .send()
                .await?;

            if response.status().is_success() {
                return Ok(response.json().await?);
            }

            let body = response.text().await?;
            match serde_json::from_str::<OAuthErrorResponse>(&body) {
                Ok(oauth) if oauth.error == "authorization_pending" => continue,
                Ok(oauth) if oauth.error == "slow_down" => {
                    // Server asked us to back off.
                    interval += 5;
                    continue;
                }
                Ok(oauth) if oauth.error == "expired_token" => {
                    return Err(AuthError::DeviceCodeExpired);
                }
                Ok(oauth) => {
                    return Err(AuthError::Denied(
                        oauth.error_description.unwrap_or(oauth.error),
                    ));
                }
                Err(_) => return Err(AuthError::Denied(body)),
            }
        }
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let url = format!("{}/oauth/token", self.base_url);
        debug!("POST {} (refresh)", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await?;
        let message = match serde_json::from_str::<OAuthErrorResponse>(&body) {
            Ok(oauth) => oauth.error_description.unwrap_or(oauth.error),
            Err(_) => body,
        };
        Err(AuthError::Denied(message))
    }
}

impl Default for AuthClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a token response into the persisted form, stamping the expiry.
pub fn stored_tokens_from(response: &TokenResponse) -> StoredTokens {
    StoredTokens {
        access_token: response.access_token.clone(),
        refresh_token: response.refresh_token.clone(),
        expires_at: Utc::now().timestamp() + response.expires_in as i64,
    }
}

/// Accessor yielding an authenticated API client, refreshing the access
/// token first when it has expired.
pub async fn authenticated_client(store: &ConfigStore) -> Result<YotoClient, AuthError> {
    let tokens = store.load()?.ok_or(AuthError::NotLoggedIn)?;

    if !tokens.is_expired(Utc::now().timestamp()) {
        return Ok(YotoClient::new(tokens.access_token));
    }

    debug!("Access token expired, refreshing");
    let auth = AuthClient::new();
    let refreshed = auth.refresh(&tokens.refresh_token).await?;
    let stored = stored_tokens_from(&refreshed);
    if let Err(e) = store.save(&stored) {
        // A failed save costs a refresh next run, nothing more.
        warn!("Failed to persist refreshed tokens: {}", e);
    }

    Ok(YotoClient::new(stored.access_token))
}
