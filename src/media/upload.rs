//! Audio upload and transcode-wait workflow.
//!
//! Uploads are content-addressed: the server is asked for a signed slot
//! keyed by the file's SHA-256, and a `None` slot URL means the bytes are
//! already stored and the transfer is skipped. Transcoding is asynchronous
//! server-side; the poller here probes the job on a fixed interval until a
//! terminal state or the attempt ceiling.

use crate::api::models::yoto_uri;
use crate::api::{ApiError, YotoApi};
use crate::media::hash::sha256_hex;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Phases the server reports while a job is still running. Anything else
/// (other than `complete`) is a terminal failure.
const IN_PROGRESS_PHASES: &[&str] = &["queued", "processing", "transcoding"];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Transcoding failed with status: {phase}")]
    TranscodeFailed { phase: String },
    #[error("Transcoding timed out after {0} seconds")]
    TimedOut(u64),
    #[error("Transcode reported complete without a content hash")]
    MissingHash,
}

/// Poll schedule for the transcode wait loop. Injected so tests can run
/// the full attempt count without wall-clock sleeps.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

impl PollConfig {
    fn total_wait_secs(&self) -> u64 {
        self.interval.as_secs() * self.max_attempts as u64
    }
}

/// Completed transcode result.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodedTrack {
    /// `yoto:#<sha256>` reference usable as a `trackUrl`.
    pub track_url: String,
    pub sha256: String,
    pub duration: Option<f64>,
}

/// Result of an upload. `track` is `None` when the caller chose not to
/// wait; the retained `upload_id` can be probed later.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub upload_id: String,
    pub track: Option<TranscodedTrack>,
}

/// Uploads a local audio file and optionally waits for the transcode.
pub struct AudioUploader<'a, A: YotoApi + ?Sized> {
    api: &'a A,
    poll: PollConfig,
}

impl<'a, A: YotoApi + ?Sized> AudioUploader<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
        }
    }

    pub fn with_poll_config(api: &'a A, poll: PollConfig) -> Self {
        Self { api, poll }
    }

    /// Upload `path` and, when `wait` is set, block until the transcode
    /// reaches a terminal state.
    pub async fn upload_and_transcode(
        &self,
        path: &Path,
        wait: bool,
    ) -> Result<UploadOutcome, UploadError> {
        let bytes = tokio::fs::read(path).await?;
        let sha256 = sha256_hex(&bytes);
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        debug!("Requesting upload slot for {} ({})", filename, sha256);
        let slot = self.api.get_audio_upload_url(&sha256, &filename).await?;

        match slot.upload_url {
            Some(upload_url) => {
                info!("Uploading {} ({} bytes)", filename, bytes.len());
                self.api.upload_file(&upload_url, bytes).await?;
            }
            None => {
                info!("File already exists on server, skipping upload");
            }
        }

        if !wait {
            return Ok(UploadOutcome {
                upload_id: slot.upload_id,
                track: None,
            });
        }

        let track = self.wait_for_transcode(&slot.upload_id).await?;
        Ok(UploadOutcome {
            upload_id: slot.upload_id,
            track: Some(track),
        })
    }

    /// Upload and wait, for callers that always need the finished track.
    pub async fn upload_and_wait(&self, path: &Path) -> Result<TranscodedTrack, UploadError> {
        let outcome = self.upload_and_transcode(path, true).await?;
        // wait=true always carries a track; MissingHash covers the
        // impossible branch without panicking.
        outcome.track.ok_or(UploadError::MissingHash)
    }

    /// Poll the transcode job until it completes, fails, or the attempt
    /// ceiling is reached.
    ///
    /// Terminal success is the `complete` phase OR a `transcodedSha256`
    /// already being present; the two signals are redundant and either is
    /// authoritative. A phase outside the in-progress set is a terminal
    /// failure carrying the raw phase string. A missing phase keeps the
    /// loop polling.
    pub async fn wait_for_transcode(
        &self,
        upload_id: &str,
    ) -> Result<TranscodedTrack, UploadError> {
        for attempt in 1..=self.poll.max_attempts {
            let job = self.api.get_transcoded_audio(upload_id).await?;
            let phase = job.progress.as_ref().and_then(|p| p.phase.clone());

            let complete = phase.as_deref() == Some("complete");
            if complete || job.transcoded_sha256.is_some() {
                let sha256 = job.transcoded_sha256.ok_or(UploadError::MissingHash)?;
                debug!("Transcode complete after {} attempts", attempt);
                return Ok(TranscodedTrack {
                    track_url: yoto_uri(&sha256),
                    sha256,
                    duration: job.transcoded_info.and_then(|info| info.duration),
                });
            }

            if let Some(ref phase) = phase {
                if !IN_PROGRESS_PHASES.contains(&phase.as_str()) {
                    return Err(UploadError::TranscodeFailed {
                        phase: phase.clone(),
                    });
                }
            }

            debug!(
                "Transcode attempt {}/{}: still {}",
                attempt,
                self.poll.max_attempts,
                phase.as_deref().unwrap_or("pending")
            );
            tokio::time::sleep(self.poll.interval).await;
        }

        Err(UploadError::TimedOut(self.poll.total_wait_secs()))
    }
}
