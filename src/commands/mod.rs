//! Command workflows.
//!
//! Each function here is one user-facing operation: it talks to the API,
//! reports through the output sink, and returns a `Result`. Process exit
//! codes are decided at the dispatch boundary in `main`, never here.

pub mod auth;
pub mod chapter;
pub mod device;
pub mod entry;
pub mod icon;
pub mod playlist;
pub mod track;

use crate::api::models::{Card, ContentRequest};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] crate::api::ApiError),
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Upload(#[from] crate::media::UploadError),
    #[error(transparent)]
    Icon(#[from] crate::icons::IconError),
    #[error(transparent)]
    Edit(#[from] crate::content::EditError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidInput(String),
}

/// Write-back body for a card mutated in memory. The whole document goes
/// back every time; the API has no partial patch.
pub(crate) fn write_back_request(card: &Card) -> ContentRequest {
    ContentRequest {
        card_id: None,
        title: card.title.clone(),
        content: card.content.clone(),
        metadata: card.metadata.clone(),
    }
}

/// `m:ss` rendering for durations in seconds.
pub(crate) fn format_duration(seconds: f64) -> String {
    format!(
        "{}:{:02}",
        (seconds / 60.0).floor() as u64,
        (seconds % 60.0).round() as u64
    )
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.0), "0:59");
        assert_eq!(format_duration(61.0), "1:01");
        assert_eq!(format_duration(754.3), "12:34");
    }
}
