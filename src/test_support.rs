// Test support utilities for both unit and integration tests

use crate::api::models::{
    Card, ContentRequest, Device, DeviceCommand, DeviceStatus, ListContentResponse, PublicIcon,
    TranscodeJob, TranscodeProgress, TranscodedInfo, UploadSlot, UploadedIcon, UserIcon,
};
use crate::api::{ApiError, YotoApi};
use crate::media::hash::sha256_hex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory stand-in for the Yoto API.
///
/// Holds cards in a map, dedups uploads by content digest the way the real
/// server does, and lets tests script the transcode phase sequence a poll
/// loop will observe.
#[derive(Default)]
pub struct MockYotoApi {
    cards: Mutex<HashMap<String, Card>>,
    created: AtomicUsize,

    seen_digests: Mutex<HashSet<String>>,
    upload_sha_by_id: Mutex<HashMap<String, String>>,
    audio_puts: AtomicUsize,

    transcode_script: Mutex<VecDeque<TranscodeJob>>,
    stuck_phase: Mutex<Option<String>>,
    transcode_probes: AtomicUsize,

    icon_puts: AtomicUsize,
    device_commands: Mutex<Vec<(String, String, Option<u8>)>>,
}

impl MockYotoApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_card(&self, card: Card) {
        self.cards
            .lock()
            .unwrap()
            .insert(card.card_id.clone(), card);
    }

    pub fn card(&self, card_id: &str) -> Option<Card> {
        self.cards.lock().unwrap().get(card_id).cloned()
    }

    /// Number of byte transfers that actually happened (dedup hits skip it).
    pub fn audio_put_count(&self) -> usize {
        self.audio_puts.load(Ordering::SeqCst)
    }

    pub fn transcode_probe_count(&self) -> usize {
        self.transcode_probes.load(Ordering::SeqCst)
    }

    pub fn icon_uploads(&self) -> usize {
        self.icon_puts.load(Ordering::SeqCst)
    }

    pub fn device_commands(&self) -> Vec<(String, String, Option<u8>)> {
        self.device_commands.lock().unwrap().clone()
    }

    /// Script the poller to observe each in-progress phase once, then a
    /// `complete` job carrying `final_sha`.
    pub fn script_transcode_phases(&self, phases: &[&str], final_sha: Option<&str>) {
        let mut script = self.transcode_script.lock().unwrap();
        for phase in phases {
            script.push_back(in_progress_job(phase));
        }
        if let Some(sha) = final_sha {
            script.push_back(complete_job(sha));
        }
    }

    /// Script the job to report the same phase forever.
    pub fn script_transcode_stuck(&self, phase: &str) {
        *self.stuck_phase.lock().unwrap() = Some(phase.to_string());
    }
}

fn in_progress_job(phase: &str) -> TranscodeJob {
    TranscodeJob {
        progress: Some(TranscodeProgress {
            phase: Some(phase.to_string()),
            percent: None,
        }),
        ..Default::default()
    }
}

fn complete_job(sha: &str) -> TranscodeJob {
    TranscodeJob {
        progress: Some(TranscodeProgress {
            phase: Some("complete".to_string()),
            percent: Some(100.0),
        }),
        transcoded_sha256: Some(sha.to_string()),
        transcoded_info: Some(TranscodedInfo {
            duration: Some(123.0),
            codec: Some("aac".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl YotoApi for MockYotoApi {
    async fn list_content(&self) -> Result<ListContentResponse, ApiError> {
        let mut cards: Vec<Card> = self.cards.lock().unwrap().values().cloned().collect();
        cards.sort_by(|a, b| a.card_id.cmp(&b.card_id));
        Ok(ListContentResponse { cards })
    }

    async fn get_content(&self, card_id: &str, _playable: bool) -> Result<Card, ApiError> {
        self.card(card_id)
            .ok_or_else(|| ApiError::NotFound(format!("card {}", card_id)))
    }

    async fn create_content(&self, request: &ContentRequest) -> Result<Card, ApiError> {
        let id = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let card = Card {
            card_id: format!("card-{}", id),
            title: request.title.clone(),
            content: request.content.clone(),
            metadata: request.metadata.clone(),
            ..Default::default()
        };
        self.insert_card(card.clone());
        Ok(card)
    }

    async fn update_content(
        &self,
        card_id: &str,
        request: &ContentRequest,
    ) -> Result<Card, ApiError> {
        let mut cards = self.cards.lock().unwrap();
        let card = cards
            .get_mut(card_id)
            .ok_or_else(|| ApiError::NotFound(format!("card {}", card_id)))?;
        card.title = request.title.clone();
        card.content = request.content.clone();
        card.metadata = request.metadata.clone();
        Ok(card.clone())
    }

    async fn delete_content(&self, card_id: &str) -> Result<(), ApiError> {
        self.cards
            .lock()
            .unwrap()
            .remove(card_id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("card {}", card_id)))
    }

    async fn get_audio_upload_url(
        &self,
        sha256: &str,
        _filename: &str,
    ) -> Result<UploadSlot, ApiError> {
        let upload_id = format!("upload-{}", &sha256[..sha256.len().min(12)]);
        self.upload_sha_by_id
            .lock()
            .unwrap()
            .insert(upload_id.clone(), sha256.to_string());

        let first_sighting = self.seen_digests.lock().unwrap().insert(sha256.to_string());
        let upload_url = if first_sighting {
            Some(format!("mock://upload/{}", upload_id))
        } else {
            None
        };

        Ok(UploadSlot {
            upload_id,
            upload_url,
        })
    }

    async fn upload_file(&self, _upload_url: &str, _bytes: Vec<u8>) -> Result<(), ApiError> {
        self.audio_puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_transcoded_audio(&self, upload_id: &str) -> Result<TranscodeJob, ApiError> {
        self.transcode_probes.fetch_add(1, Ordering::SeqCst);

        if let Some(phase) = self.stuck_phase.lock().unwrap().clone() {
            return Ok(in_progress_job(&phase));
        }

        if let Some(job) = self.transcode_script.lock().unwrap().pop_front() {
            return Ok(job);
        }

        // Unscripted probes complete immediately with a digest derived from
        // the uploaded content, so workflow tests get stable track URLs.
        let sha = self
            .upload_sha_by_id
            .lock()
            .unwrap()
            .get(upload_id)
            .cloned()
            .unwrap_or_else(|| format!("transcoded-{}", upload_id));
        Ok(complete_job(&sha))
    }

    async fn upload_icon(
        &self,
        bytes: Vec<u8>,
        _filename: &str,
        _auto_convert: bool,
    ) -> Result<UploadedIcon, ApiError> {
        self.icon_puts.fetch_add(1, Ordering::SeqCst);
        let digest = sha256_hex(&bytes);
        Ok(UploadedIcon {
            display_icon_id: format!("di-{}", &digest[..8]),
            media_id: format!("icon-{}", &digest[..8]),
            new: Some(true),
            url: serde_json::Value::String(format!("mock://icons/{}", &digest[..8])),
            user_id: "user-1".to_string(),
        })
    }

    async fn list_public_icons(&self) -> Result<Vec<PublicIcon>, ApiError> {
        Ok(vec![PublicIcon {
            created_at: "2024-01-01T00:00:00Z".to_string(),
            display_icon_id: "pub-di-1".to_string(),
            media_id: "pub-icon-1".to_string(),
            new: None,
            public: true,
            public_tags: vec!["music".to_string()],
            title: Some("Note".to_string()),
            url: "mock://icons/pub-1".to_string(),
            user_id: "yoto".to_string(),
        }])
    }

    async fn list_user_icons(&self) -> Result<Vec<UserIcon>, ApiError> {
        Ok(vec![UserIcon {
            created_at: "2024-02-02T00:00:00Z".to_string(),
            display_icon_id: "user-di-1".to_string(),
            media_id: "user-icon-1".to_string(),
            public: false,
            url: "mock://icons/user-1".to_string(),
            user_id: "user-1".to_string(),
        }])
    }

    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        Ok(vec![Device {
            device_id: "Y1234".to_string(),
            name: "Kitchen player".to_string(),
            device_type: Some("v3".to_string()),
            online: Some(true),
        }])
    }

    async fn get_device_status(&self, device_id: &str) -> Result<DeviceStatus, ApiError> {
        if device_id != "Y1234" {
            return Err(ApiError::NotFound(format!("device {}", device_id)));
        }
        Ok(DeviceStatus {
            player_status: Some("paused".to_string()),
            volume: Some(40.0),
            battery_level: Some(80.0),
            ..Default::default()
        })
    }

    async fn send_device_command(
        &self,
        device_id: &str,
        command: &DeviceCommand,
    ) -> Result<(), ApiError> {
        self.device_commands.lock().unwrap().push((
            device_id.to_string(),
            command.name().to_string(),
            command.volume(),
        ));
        Ok(())
    }
}

/// Build a card with the given id/title and no chapters.
pub fn empty_card(card_id: &str, title: &str) -> Card {
    Card {
        card_id: card_id.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}
