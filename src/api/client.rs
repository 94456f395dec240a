use crate::api::models::{
    Card, ContentRequest, Device, DeviceCommand, DeviceStatus, GetContentResponse,
    GetDevicesResponse, GetPublicIconsResponse, GetUserIconsResponse, ListContentResponse,
    TranscodeJob, TranscodedAudioResponse, UploadIconResponse, UploadSlot, UploadUrlResponse,
    UploadedIcon,
};
use reqwest::{Client, Error as ReqwestError};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.yotoplay.com";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
    #[error("Yoto API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Structured error body the API returns on most failures.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    code: String,
    message: String,
}

/// Contract of the authenticated API, kept behind a trait so commands and
/// the upload pipeline can run against an in-memory double in tests.
#[async_trait::async_trait]
pub trait YotoApi: Send + Sync {
    async fn list_content(&self) -> Result<ListContentResponse, ApiError>;
    async fn get_content(&self, card_id: &str, playable: bool) -> Result<Card, ApiError>;
    async fn create_content(&self, request: &ContentRequest) -> Result<Card, ApiError>;
    async fn update_content(
        &self,
        card_id: &str,
        request: &ContentRequest,
    ) -> Result<Card, ApiError>;
    async fn delete_content(&self, card_id: &str) -> Result<(), ApiError>;

    /// Request a signed upload slot for a digest. `upload_url: None` in the
    /// result means the server already stores the blob (dedup hit).
    async fn get_audio_upload_url(
        &self,
        sha256: &str,
        filename: &str,
    ) -> Result<UploadSlot, ApiError>;

    /// PUT raw bytes to a signed upload URL.
    async fn upload_file(&self, upload_url: &str, bytes: Vec<u8>) -> Result<(), ApiError>;

    /// Fetch the current transcode job state for an upload.
    async fn get_transcoded_audio(&self, upload_id: &str) -> Result<TranscodeJob, ApiError>;

    async fn upload_icon(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        auto_convert: bool,
    ) -> Result<UploadedIcon, ApiError>;
    async fn list_public_icons(&self) -> Result<Vec<crate::api::models::PublicIcon>, ApiError>;
    async fn list_user_icons(&self) -> Result<Vec<crate::api::models::UserIcon>, ApiError>;

    async fn list_devices(&self) -> Result<Vec<Device>, ApiError>;
    async fn get_device_status(&self, device_id: &str) -> Result<DeviceStatus, ApiError>;
    async fn send_device_command(
        &self,
        device_id: &str,
        command: &DeviceCommand,
    ) -> Result<(), ApiError>;
}

/// Authenticated HTTP client for the Yoto API.
#[derive(Clone)]
pub struct YotoClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl YotoClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token,
        }
    }

    /// Point the client at a different host (tests, staging).
    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            access_token,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Check the response status, extracting the API's error message when
    /// there is one. The raw body is kept when the shape is unfamiliar.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => envelope.error.message,
            Err(_) => body,
        };

        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl YotoApi for YotoClient {
    async fn list_content(&self) -> Result<ListContentResponse, ApiError> {
        let url = format!("{}/content/mine", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn get_content(&self, card_id: &str, playable: bool) -> Result<Card, ApiError> {
        let url = format!("{}/content/{}", self.base_url, card_id);
        debug!("GET {}", url);

        let mut request = self.client.get(&url).header("Authorization", self.bearer());
        if playable {
            request = request.query(&[("playable", "true")]);
        }

        let response = request.send().await?;
        if response.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("card {}", card_id)));
        }

        let parsed: GetContentResponse = Self::parse(response).await?;
        Ok(parsed.card)
    }

    async fn create_content(&self, request: &ContentRequest) -> Result<Card, ApiError> {
        let url = format!("{}/content", self.base_url);
        debug!("POST {} (create)", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(request)
            .send()
            .await?;

        let parsed: GetContentResponse = Self::parse(response).await?;
        Ok(parsed.card)
    }

    async fn update_content(
        &self,
        card_id: &str,
        request: &ContentRequest,
    ) -> Result<Card, ApiError> {
        // Updates go through the same endpoint as creates, addressed by the
        // cardId carried in the body.
        let url = format!("{}/content", self.base_url);
        debug!("POST {} (update {})", url, card_id);

        let mut body = request.clone();
        body.card_id = Some(card_id.to_string());

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&body)
            .send()
            .await?;

        let parsed: GetContentResponse = Self::parse(response).await?;
        Ok(parsed.card)
    }

    async fn delete_content(&self, card_id: &str) -> Result<(), ApiError> {
        let url = format!("{}/content/{}", self.base_url, card_id);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn get_audio_upload_url(
        &self,
        sha256: &str,
        filename: &str,
    ) -> Result<UploadSlot, ApiError> {
        let url = format!("{}/media/transcode/audio/uploadUrl", self.base_url);
        debug!("GET {} sha256={}", url, sha256);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .query(&[("sha256", sha256), ("filename", filename)])
            .send()
            .await?;

        let parsed: UploadUrlResponse = Self::parse(response).await?;
        Ok(parsed.upload)
    }

    async fn upload_file(&self, upload_url: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
        debug!("PUT {} ({} bytes)", upload_url, bytes.len());

        // The slot URL is pre-signed; no Authorization header goes with it.
        let response = self
            .client
            .put(upload_url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn get_transcoded_audio(&self, upload_id: &str) -> Result<TranscodeJob, ApiError> {
        let url = format!(
            "{}/media/upload/{}/transcoded",
            self.base_url, upload_id
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .query(&[("loudnorm", "false")])
            .send()
            .await?;

        let parsed: TranscodedAudioResponse = Self::parse(response).await?;
        Ok(parsed.transcode)
    }

    async fn upload_icon(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        auto_convert: bool,
    ) -> Result<UploadedIcon, ApiError> {
        let url = format!("{}/media/displayIcons/user/me/upload", self.base_url);
        debug!("POST {} ({} bytes)", url, bytes.len());

        let auto_convert = if auto_convert { "true" } else { "false" };
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/octet-stream")
            .query(&[("autoConvert", auto_convert), ("filename", filename)])
            .body(bytes)
            .send()
            .await?;

        let parsed: UploadIconResponse = Self::parse(response).await?;
        Ok(parsed.display_icon)
    }

    async fn list_public_icons(&self) -> Result<Vec<crate::api::models::PublicIcon>, ApiError> {
        let url = format!("{}/media/displayIcons/user/yoto", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let parsed: GetPublicIconsResponse = Self::parse(response).await?;
        Ok(parsed.display_icons)
    }

    async fn list_user_icons(&self) -> Result<Vec<crate::api::models::UserIcon>, ApiError> {
        let url = format!("{}/media/displayIcons/user/me", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let parsed: GetUserIconsResponse = Self::parse(response).await?;
        Ok(parsed.display_icons)
    }

    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        let url = format!("{}/device-v2/devices/mine", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let parsed: GetDevicesResponse = Self::parse(response).await?;
        Ok(parsed.devices)
    }

    async fn get_device_status(&self, device_id: &str) -> Result<DeviceStatus, ApiError> {
        let url = format!("{}/device-v2/{}/status", self.base_url, device_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("device {}", device_id)));
        }

        Self::parse(response).await
    }

    async fn send_device_command(
        &self,
        device_id: &str,
        command: &DeviceCommand,
    ) -> Result<(), ApiError> {
        let url = format!("{}/device-v2/{}/command", self.base_url, device_id);
        debug!("POST {} {}", url, command.name());

        let mut body = serde_json::json!({ "command": command.name() });
        if let Some(level) = command.volume() {
            body["volume"] = serde_json::json!(level);
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&body)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
