//! Wire types for the Yoto REST API.
//!
//! Shapes follow what the API actually returns. Optional fields stay
//! optional, and every document-level struct carries a flattened passthrough
//! map so a full fetch-modify-write cycle never drops fields this client
//! does not model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// URI scheme used for internally hosted audio and for icon references.
pub const YOTO_URI_PREFIX: &str = "yoto:#";

/// Build a `yoto:#` reference from a content hash or icon media id.
pub fn yoto_uri(id: &str) -> String {
    format!("{}{}", YOTO_URI_PREFIX, id)
}

/// 16x16 display icon attachment shared by chapters and tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Display {
    #[serde(rename = "icon16x16", skip_serializing_if = "Option::is_none")]
    pub icon_16x16: Option<String>,
}

impl Display {
    pub fn icon(media_id: &str) -> Self {
        Display {
            icon_16x16: Some(yoto_uri(media_id)),
        }
    }
}

/// End-of-track behavior. `cmd` is `"none"` (continue), `"stop"` (pause)
/// or `"repeat"` (loop).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackEvents {
    #[serde(rename = "onEnd", skip_serializing_if = "Option::is_none")]
    pub on_end: Option<OnEnd>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OnEnd {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub track_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Serialized as an explicit `null` when present (the API stores it
    /// that way on newly created tracks).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<TrackEvents>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(rename = "_originalFileName", skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_track_display: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_track_ambient: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_timeout: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Playable body of a card. List responses may omit `chapters` entirely,
/// which is why the field defaults instead of failing the parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ContentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root playlist document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub card_id: String,
    pub title: String,
    #[serde(default)]
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for content create/update. Updates carry the `cardId`; creates
/// leave it out and the server assigns one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    pub title: String,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetContentResponse {
    pub card: Card,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListContentResponse {
    pub cards: Vec<Card>,
}

// ---- media upload / transcode ----

#[derive(Debug, Clone, Deserialize)]
pub struct UploadUrlResponse {
    pub upload: UploadSlot,
}

/// Signed upload slot. `upload_url: None` means the server already has a
/// blob with the requested digest and the byte transfer must be skipped.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    pub upload_id: String,
    #[serde(default)]
    pub upload_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscodedAudioResponse {
    pub transcode: TranscodeJob,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<TranscodeProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcoded_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcoded_info: Option<TranscodedInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscodeProgress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodedInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---- icons ----
//
// Public and user icon listings genuinely differ in shape (the public
// listing carries tags and a sometimes-omitted title), so they are two
// separate structs rather than one struct with everything optional.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIcon {
    pub created_at: String,
    pub display_icon_id: String,
    pub media_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<bool>,
    pub public: bool,
    #[serde(default)]
    pub public_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIcon {
    pub created_at: String,
    pub display_icon_id: String,
    pub media_id: String,
    pub public: bool,
    pub url: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPublicIconsResponse {
    pub display_icons: Vec<PublicIcon>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserIconsResponse {
    pub display_icons: Vec<UserIcon>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadIconResponse {
    pub display_icon: UploadedIcon,
}

/// Result of an icon upload. `url` is a string normally but an empty JSON
/// object when the upload deduplicated against an existing icon, so it
/// stays an untyped value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedIcon {
    pub display_icon_id: String,
    pub media_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<bool>,
    pub url: Value,
    pub user_id: String,
}

// ---- devices ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetDevicesResponse {
    pub devices: Vec<Device>,
}

/// Transport command sent to a device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    SetVolume(u8),
}

impl DeviceCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceCommand::Play => "play",
            DeviceCommand::Pause => "pause",
            DeviceCommand::Stop => "stop",
            DeviceCommand::Next => "next",
            DeviceCommand::Previous => "previous",
            DeviceCommand::SetVolume(_) => "volume",
        }
    }

    pub fn volume(&self) -> Option<u8> {
        match self {
            DeviceCommand::SetVolume(level) => Some(*level),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_round_trip_preserves_unmodeled_fields() {
        let raw = serde_json::json!({
            "cardId": "abc12",
            "title": "Bedtime",
            "content": {
                "chapters": [{
                    "key": "00",
                    "title": "Intro",
                    "tracks": [{
                        "key": "01",
                        "title": "Intro",
                        "trackUrl": "yoto:#deadbeef",
                        "type": "audio",
                        "serverOnlyField": 7
                    }],
                    "display": { "icon16x16": "yoto:#icon1" }
                }],
                "playbackType": "linear",
                "editSettings": { "locked": true }
            },
            "metadata": { "author": "Mom" },
            "slug": "bedtime"
        });

        let card: Card = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(card.card_id, "abc12");
        assert_eq!(card.content.chapters.len(), 1);
        assert_eq!(
            card.content.chapters[0].tracks[0].track_url.as_deref(),
            Some("yoto:#deadbeef")
        );

        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back["slug"], "bedtime");
        assert_eq!(back["content"]["editSettings"]["locked"], true);
        assert_eq!(
            back["content"]["chapters"][0]["tracks"][0]["serverOnlyField"],
            7
        );
    }

    #[test]
    fn test_list_response_without_chapters_parses() {
        let raw = serde_json::json!({
            "cards": [{ "cardId": "x", "title": "Summary only", "content": {} }]
        });
        let parsed: ListContentResponse = serde_json::from_value(raw).unwrap();
        assert!(parsed.cards[0].content.chapters.is_empty());
    }

    #[test]
    fn test_upload_slot_null_url_is_dedup_hit() {
        let slot: UploadSlot =
            serde_json::from_value(serde_json::json!({ "uploadId": "u1", "uploadUrl": null }))
                .unwrap();
        assert_eq!(slot.upload_url, None);
    }

    #[test]
    fn test_uploaded_icon_url_may_be_empty_object() {
        let raw = serde_json::json!({
            "displayIcon": {
                "displayIconId": "d1",
                "mediaId": "m1",
                "url": {},
                "userId": "u1"
            }
        });
        let parsed: UploadIconResponse = serde_json::from_value(raw).unwrap();
        assert!(parsed.display_icon.url.is_object());
    }
}
