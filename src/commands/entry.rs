//! Entry workflows: one chapter holding exactly one track, managed as a
//! single unit.
//!
//! `add` is the compositor — upload + transcode, icon resolution, and the
//! document append happen as one command so the caller never sees a
//! half-built entry. `update` keeps the denormalized title/icon duplicates
//! on the chapter and its tracks in sync.

use crate::api::models::{yoto_uri, Chapter, Display, Track};
use crate::api::YotoApi;
use crate::commands::{format_duration, write_back_request, CommandError};
use crate::icons::IconResolver;
use crate::media::AudioUploader;
use crate::output;
use serde::Serialize;
use serde_json::Value;
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
struct EntryAdded {
    card_id: String,
    entry_index: usize,
    title: String,
    track_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

/// Add an entry: upload the audio, resolve the icon, then append a
/// one-track chapter and write the document back.
pub async fn add<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    title: &str,
    options: AddOptions,
) -> Result<(), CommandError> {
    let file = options
        .file
        .ok_or_else(|| CommandError::InvalidInput("--file is required for entry add".to_string()))?;

    let file_size = tokio::fs::metadata(&file).await?.len();
    let original_file_name = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    output::info(&format!("Uploading {}...", file.display()));
    let track = AudioUploader::new(api).upload_and_wait(&file).await?;

    let resolver = match options.default_icon {
        Some(default_icon) => IconResolver::with_default_icon(api, default_icon),
        None => IconResolver::new(api),
    };
    let media_id = resolver.resolve_or_default(options.icon.as_deref()).await?;
    let icon_display = Display::icon(&media_id);

    let mut card = api.get_content(card_id, false).await?;
    let entry_index = card.content.chapters.len();
    let key = card.content.next_chapter_key();
    // 1-based label shown on the player display, shared by chapter and track.
    let overlay_label = (entry_index + 1).to_string();

    let entry_track = Track {
        key: "01".to_string(),
        title: title.to_string(),
        track_url: Some(track.track_url.clone()),
        track_type: Some("audio".to_string()),
        format: Some("aac".to_string()),
        duration: track.duration,
        file_size: Some(file_size),
        overlay_label: Some(overlay_label.clone()),
        display: Some(icon_display.clone()),
        ambient: Some(Value::Null),
        ..Default::default()
    };

    card.content.push_chapter(Chapter {
        key,
        title: title.to_string(),
        duration: track.duration,
        tracks: vec![entry_track],
        overlay_label: Some(overlay_label),
        display: Some(icon_display),
        file_size: Some(file_size),
        original_file_name: Some(original_file_name),
        available_from: Some(Value::Null),
        ambient: Some(Value::Null),
        default_track_display: Some(Value::Null),
        default_track_ambient: Some(Value::Null),
        ..Default::default()
    });

    api.update_content(card_id, &write_back_request(&card)).await?;

    if options.json {
        output::json(&EntryAdded {
            card_id: card_id.to_string(),
            entry_index,
            title: title.to_string(),
            track_url: track.track_url,
            duration: track.duration,
        });
        return Ok(());
    }

    output::success(&format!("Added entry \"{}\" to playlist", title));
    if let Some(duration) = track.duration {
        output::info(&format!("Duration: {}", format_duration(duration)));
    }
    Ok(())
}

/// Update an entry's title and/or icon, propagating to the chapter and
/// every track beneath it.
pub async fn update<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    entry_index: usize,
    title: Option<String>,
    icon: Option<String>,
) -> Result<(), CommandError> {
    let mut card = api.get_content(card_id, false).await?;
    card.content.chapter(entry_index)?;

    let media_id = match &icon {
        Some(icon) => Some(IconResolver::new(api).resolve(icon).await?),
        None => None,
    };

    let chapter = card.content.chapter_mut(entry_index)?;
    if let Some(title) = &title {
        chapter.title = title.clone();
        for track in &mut chapter.tracks {
            track.title = title.clone();
        }
    }
    if let Some(media_id) = &media_id {
        let icon_ref = yoto_uri(media_id);
        chapter
            .display
            .get_or_insert_with(Display::default)
            .icon_16x16 = Some(icon_ref.clone());
        for track in &mut chapter.tracks {
            track
                .display
                .get_or_insert_with(Display::default)
                .icon_16x16 = Some(icon_ref.clone());
        }
    }
    let entry_title = chapter.title.clone();

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!("Updated entry \"{}\"", entry_title));
    Ok(())
}

/// Delete an entry (its chapter and tracks) by position.
pub async fn delete<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    entry_index: usize,
) -> Result<(), CommandError> {
    let mut card = api.get_content(card_id, false).await?;
    let removed = card.content.remove_chapter(entry_index)?;

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!("Deleted entry \"{}\"", removed.title));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::hash::sha256_hex;
    use crate::test_support::{empty_card, MockYotoApi};
    use std::path::Path;

    fn write_audio(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    async fn add_entry(api: &MockYotoApi, file: &Path, title: &str) {
        add(
            api,
            "c1",
            title,
            AddOptions {
                file: Some(file.to_path_buf()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_add_requires_a_file() {
        let api = MockYotoApi::new();
        let err = add(&api, "c1", "X", AddOptions::default()).await.unwrap_err();
        match err {
            CommandError::InvalidInput(message) => assert!(message.contains("--file")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_round_trip() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        let dir = tempfile::tempdir().unwrap();
        let audio = b"entry audio bytes";
        let file = write_audio(&dir, "story.mp3", audio);

        add_entry(&api, &file, "Story").await;

        let card = api.card("c1").unwrap();
        assert_eq!(card.content.chapters.len(), 1);
        let chapter = &card.content.chapters[0];
        assert_eq!(chapter.tracks.len(), 1);
        let track = &chapter.tracks[0];

        // Chapter and track share the title; the track URL carries the
        // transcoded digest.
        assert_eq!(chapter.title, "Story");
        assert_eq!(track.title, "Story");
        assert_eq!(
            track.track_url.as_deref(),
            Some(format!("yoto:#{}", sha256_hex(audio)).as_str())
        );

        assert_eq!(chapter.key, "00");
        assert_eq!(chapter.overlay_label.as_deref(), Some("1"));
        assert_eq!(track.overlay_label.as_deref(), Some("1"));
        assert_eq!(track.format.as_deref(), Some("aac"));
        assert_eq!(track.file_size, Some(audio.len() as u64));
        assert_eq!(chapter.original_file_name.as_deref(), Some("story"));
    }

    #[tokio::test]
    async fn test_overlay_labels_are_one_based_per_position() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        let dir = tempfile::tempdir().unwrap();
        let first = write_audio(&dir, "a.mp3", b"first");
        let second = write_audio(&dir, "b.mp3", b"second");

        add_entry(&api, &first, "First").await;
        add_entry(&api, &second, "Second").await;

        let card = api.card("c1").unwrap();
        assert_eq!(card.content.chapters[0].overlay_label.as_deref(), Some("1"));
        assert_eq!(card.content.chapters[1].overlay_label.as_deref(), Some("2"));
        assert_eq!(card.content.chapters[1].key, "01");
    }

    #[tokio::test]
    async fn test_update_icon_only_leaves_titles_alone() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        let dir = tempfile::tempdir().unwrap();
        let file = write_audio(&dir, "a.mp3", b"bytes");
        add_entry(&api, &file, "Keep me").await;

        update(&api, "c1", 0, None, Some("yoto:#newicon".to_string()))
            .await
            .unwrap();

        let card = api.card("c1").unwrap();
        let chapter = &card.content.chapters[0];
        assert_eq!(chapter.title, "Keep me");
        assert_eq!(
            chapter.display.as_ref().unwrap().icon_16x16.as_deref(),
            Some("yoto:#newicon")
        );
        let track = &chapter.tracks[0];
        assert_eq!(track.title, "Keep me");
        assert_eq!(
            track.display.as_ref().unwrap().icon_16x16.as_deref(),
            Some("yoto:#newicon")
        );
    }

    #[tokio::test]
    async fn test_update_title_propagates_to_tracks() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        let dir = tempfile::tempdir().unwrap();
        let file = write_audio(&dir, "a.mp3", b"bytes");
        add_entry(&api, &file, "Old").await;

        update(&api, "c1", 0, Some("New".to_string()), None)
            .await
            .unwrap();

        let card = api.card("c1").unwrap();
        assert_eq!(card.content.chapters[0].title, "New");
        assert_eq!(card.content.chapters[0].tracks[0].title, "New");
    }

    #[tokio::test]
    async fn test_delete_shifts_following_entries() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        let dir = tempfile::tempdir().unwrap();
        for (name, title) in [("a.mp3", "A"), ("b.mp3", "B"), ("c.mp3", "C")] {
            let file = write_audio(&dir, name, title.as_bytes());
            add_entry(&api, &file, title).await;
        }

        let before = api.card("c1").unwrap().content.chapters.len();
        delete(&api, "c1", 1).await.unwrap();

        let card = api.card("c1").unwrap();
        assert_eq!(card.content.chapters.len(), before - 1);
        let titles: Vec<&str> = card
            .content
            .chapters
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_update_out_of_range_entry() {
        let api = MockYotoApi::new();
        api.insert_card(empty_card("c1", "List"));
        let err = update(&api, "c1", 5, Some("X".to_string()), None)
            .await
            .unwrap_err();
        match err {
            CommandError::Edit(_) => {}
            other => panic!("expected Edit error, got {:?}", other),
        }
    }
}
