use crate::api::models::{Chapter, Display, Track};
use crate::api::YotoApi;
use crate::commands::{format_duration, write_back_request, CommandError};
use crate::icons::IconResolver;
use crate::media::{AudioUploader, TranscodedTrack};
use crate::output;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct AddOptions {
    pub icon: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    /// Overrides the built-in default icon; mainly for tests.
    pub default_icon: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterAdded {
    card_id: String,
    chapter_index: usize,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    track_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

/// Add a chapter, optionally uploading an audio file as its first track.
pub async fn add<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    title: &str,
    options: AddOptions,
) -> Result<(), CommandError> {
    let uploaded: Option<TranscodedTrack> = match &options.file {
        Some(file) => {
            output::info(&format!("Uploading {}...", file.display()));
            Some(AudioUploader::new(api).upload_and_wait(file).await?)
        }
        None => None,
    };

    let resolver = match options.default_icon {
        Some(default_icon) => IconResolver::with_default_icon(api, default_icon),
        None => IconResolver::new(api),
    };
    let media_id = resolver.resolve_or_default(options.icon.as_deref()).await?;

    let mut card = api.get_content(card_id, false).await?;
    let chapter_index = card.content.chapters.len();
    let key = card.content.next_chapter_key();

    let mut tracks = Vec::new();
    if let Some(track) = &uploaded {
        tracks.push(Track {
            key: "01".to_string(),
            title: title.to_string(),
            track_url: Some(track.track_url.clone()),
            track_type: Some("audio".to_string()),
            duration: track.duration,
            ..Default::default()
        });
    }

    card.content.push_chapter(Chapter {
        key,
        title: title.to_string(),
        icon: Some(media_id.clone()),
        display: Some(Display::icon(&media_id)),
        tracks,
        ..Default::default()
    });

    api.update_content(card_id, &write_back_request(&card)).await?;

    if options.json {
        output::json(&ChapterAdded {
            card_id: card_id.to_string(),
            chapter_index,
            title: title.to_string(),
            track_url: uploaded.as_ref().map(|t| t.track_url.clone()),
            duration: uploaded.as_ref().and_then(|t| t.duration),
        });
        return Ok(());
    }

    match &uploaded {
        Some(track) => {
            output::success(&format!("Added chapter \"{}\" with track to playlist", title));
            if let Some(duration) = track.duration {
                output::info(&format!("Duration: {}", format_duration(duration)));
            }
        }
        None => output::success(&format!("Added chapter \"{}\" to playlist", title)),
    }
    Ok(())
}

/// Update a chapter's title and/or icon.
pub async fn edit<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    chapter_index: usize,
    title: Option<String>,
    icon: Option<String>,
) -> Result<(), CommandError> {
    let mut card = api.get_content(card_id, false).await?;
    card.content.chapter(chapter_index)?;

    let media_id = match &icon {
        Some(icon) => Some(IconResolver::new(api).resolve(icon).await?),
        None => None,
    };

    let chapter = card.content.chapter_mut(chapter_index)?;
    if let Some(title) = title {
        chapter.title = title;
    }
    if let Some(media_id) = &media_id {
        chapter.set_icon(media_id);
    }
    let chapter_title = chapter.title.clone();

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!("Updated chapter \"{}\"", chapter_title));
    Ok(())
}

/// Delete a chapter (and all tracks under it) by position.
pub async fn delete<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    chapter_index: usize,
) -> Result<(), CommandError> {
    let mut card = api.get_content(card_id, false).await?;
    let removed = card.content.remove_chapter(chapter_index)?;

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!("Deleted chapter \"{}\"", removed.title));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_card, MockYotoApi};

    #[tokio::test]
    async fn test_add_without_file_creates_empty_chapter() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));

        add(&api, "c1", "Quiet time", AddOptions::default())
            .await
            .unwrap();

        let card = api.card("c1").unwrap();
        assert_eq!(card.content.chapters.len(), 1);
        let chapter = &card.content.chapters[0];
        assert_eq!(chapter.key, "00");
        assert_eq!(chapter.title, "Quiet time");
        assert!(chapter.tracks.is_empty());
        // Default icon applies when none was given.
        assert_eq!(
            chapter.icon.as_deref(),
            Some(crate::icons::DEFAULT_ICON_MEDIA_ID)
        );
    }

    #[tokio::test]
    async fn test_add_with_file_attaches_transcoded_track() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        std::fs::write(&file, b"audio bytes").unwrap();

        add(
            &api,
            "c1",
            "Song",
            AddOptions {
                file: Some(file),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let card = api.card("c1").unwrap();
        let chapter = &card.content.chapters[0];
        assert_eq!(chapter.tracks.len(), 1);
        let track = &chapter.tracks[0];
        assert_eq!(track.key, "01");
        assert_eq!(track.track_type.as_deref(), Some("audio"));
        assert!(track
            .track_url
            .as_deref()
            .unwrap()
            .starts_with("yoto:#"));
    }

    #[tokio::test]
    async fn test_edit_out_of_range_is_edit_error() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));

        let err = edit(&api, "c1", 3, Some("x".to_string()), None)
            .await
            .unwrap_err();
        match err {
            CommandError::Edit(_) => {}
            other => panic!("expected Edit error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_by_position() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        add(&api, "c1", "One", AddOptions::default()).await.unwrap();
        add(&api, "c1", "Two", AddOptions::default()).await.unwrap();
        add(&api, "c1", "Three", AddOptions::default())
            .await
            .unwrap();

        delete(&api, "c1", 1).await.unwrap();

        let card = api.card("c1").unwrap();
        let titles: Vec<&str> = card
            .content
            .chapters
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec!["One", "Three"]);
    }
}
