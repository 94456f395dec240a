use crate::api::models::{Display, OnEnd, Track, TrackEvents};
use crate::api::YotoApi;
use crate::commands::{format_duration, write_back_request, CommandError};
use crate::content::TrackSource;
use crate::icons::IconResolver;
use crate::media::AudioUploader;
use crate::output;
use serde::Serialize;
use std::path::Path;

const ON_END_VALUES: &[&str] = &["none", "stop", "repeat"];

#[derive(Debug, Default)]
pub struct AddOptions {
    pub icon: Option<String>,
    pub duration: Option<f64>,
}

#[derive(Debug, Default)]
pub struct EditOptions {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
    pub on_end: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    track_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
    upload_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

/// Add a track to a chapter. The source may be a local file (uploaded and
/// transcoded), a `yoto:#` reference, or an external URL.
pub async fn add<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    chapter_index: usize,
    title: &str,
    source: &str,
    options: AddOptions,
) -> Result<(), CommandError> {
    let (track_url, duration) = match TrackSource::classify(source) {
        TrackSource::Internal(url) | TrackSource::External(url) => (url, options.duration),
        TrackSource::LocalFile(path) => {
            output::info(&format!("Uploading {}...", source));
            let track = AudioUploader::new(api).upload_and_wait(&path).await?;
            (track.track_url, options.duration.or(track.duration))
        }
    };

    let media_id = match &options.icon {
        Some(icon) => Some(IconResolver::new(api).resolve(icon).await?),
        None => None,
    };

    let mut card = api.get_content(card_id, false).await?;
    let chapter = card.content.chapter_mut(chapter_index)?;

    chapter.tracks.push(Track {
        key: chapter.next_track_key(),
        title: title.to_string(),
        track_url: Some(track_url),
        track_type: Some("audio".to_string()),
        duration,
        icon: media_id.clone(),
        display: media_id.as_deref().map(Display::icon),
        ..Default::default()
    });
    let chapter_title = chapter.title.clone();

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!(
        "Added track \"{}\" to chapter \"{}\"",
        title, chapter_title
    ));
    Ok(())
}

/// Update a track's title, icon, URL or end-of-track behavior.
pub async fn edit<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    chapter_index: usize,
    track_index: usize,
    options: EditOptions,
) -> Result<(), CommandError> {
    if let Some(on_end) = &options.on_end {
        if !ON_END_VALUES.contains(&on_end.as_str()) {
            return Err(CommandError::InvalidInput(format!(
                "Invalid --on-end value \"{}\". Expected one of: none, stop, repeat",
                on_end
            )));
        }
    }

    let mut card = api.get_content(card_id, false).await?;
    card.content.chapter(chapter_index)?.tracks
        .get(track_index)
        .ok_or(crate::content::EditError::TrackNotFound(track_index))?;

    let media_id = match &options.icon {
        Some(icon) => Some(IconResolver::new(api).resolve(icon).await?),
        None => None,
    };

    let chapter = card.content.chapter_mut(chapter_index)?;
    let track = chapter.track_mut(track_index)?;
    if let Some(title) = options.title {
        track.title = title;
    }
    if let Some(media_id) = &media_id {
        track.set_display_icon(media_id);
    }
    if let Some(url) = options.url {
        track.track_url = Some(url);
    }
    if let Some(on_end) = options.on_end {
        track.events = Some(TrackEvents {
            on_end: Some(OnEnd { cmd: Some(on_end) }),
        });
    }
    let track_title = track.title.clone();

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!("Updated track \"{}\"", track_title));
    Ok(())
}

/// Delete a track from a chapter by position.
pub async fn delete<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    chapter_index: usize,
    track_index: usize,
) -> Result<(), CommandError> {
    let mut card = api.get_content(card_id, false).await?;
    let chapter = card.content.chapter_mut(chapter_index)?;
    let removed = chapter.remove_track(track_index)?;
    let chapter_title = chapter.title.clone();

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!(
        "Deleted track \"{}\" from chapter \"{}\"",
        removed.title, chapter_title
    ));
    Ok(())
}

/// Upload an audio file and print the resulting track URL.
pub async fn upload<A: YotoApi + ?Sized>(
    api: &A,
    file: &Path,
    wait: bool,
    json: bool,
) -> Result<(), CommandError> {
    if wait {
        output::info("Waiting for transcoding...");
    }
    let outcome = AudioUploader::new(api).upload_and_transcode(file, wait).await?;

    let track = match outcome.track {
        None => {
            output::info(&format!("Upload ID: {}", outcome.upload_id));
            output::info(&format!(
                "Use 'yoto track status {}' to check status",
                outcome.upload_id
            ));
            return Ok(());
        }
        Some(track) => track,
    };

    if json {
        output::json(&UploadReport {
            track_url: Some(track.track_url.clone()),
            sha256: Some(track.sha256.clone()),
            upload_id: outcome.upload_id,
            duration: track.duration,
        });
        return Ok(());
    }

    output::success("Transcoding complete");
    output::info(&format!("Track URL: {}", track.track_url));
    if let Some(duration) = track.duration {
        output::info(&format!("Duration: {}", format_duration(duration)));
    }
    output::info(&format!(
        "Use with: yoto track add <cardId> <chapterIdx> \"Title\" \"{}\"",
        track.track_url
    ));
    Ok(())
}

/// Check (or wait on) the transcode status of a prior upload.
pub async fn status<A: YotoApi + ?Sized>(
    api: &A,
    upload_id: &str,
    wait: bool,
    json: bool,
) -> Result<(), CommandError> {
    if wait {
        output::info("Waiting for transcoding...");
        let track = AudioUploader::new(api).wait_for_transcode(upload_id).await?;

        if json {
            output::json(&UploadReport {
                track_url: Some(track.track_url.clone()),
                sha256: Some(track.sha256.clone()),
                upload_id: upload_id.to_string(),
                duration: track.duration,
            });
            return Ok(());
        }

        output::success("Transcoding complete");
        output::info(&format!("Track URL: {}", track.track_url));
        if let Some(duration) = track.duration {
            output::info(&format!("Duration: {}", format_duration(duration)));
        }
        return Ok(());
    }

    let job = api.get_transcoded_audio(upload_id).await?;

    if json {
        output::json(&job);
        return Ok(());
    }

    match &job.transcoded_sha256 {
        Some(sha256) => {
            output::success("Transcoding complete");
            output::info(&format!(
                "Track URL: {}",
                crate::api::models::yoto_uri(sha256)
            ));
            if let Some(duration) = job.transcoded_info.as_ref().and_then(|i| i.duration) {
                output::info(&format!("Duration: {}", format_duration(duration)));
            }
        }
        None => {
            let progress = job.progress.as_ref();
            let phase = progress
                .and_then(|p| p.phase.as_deref())
                .unwrap_or("unknown");
            let percent = progress
                .and_then(|p| p.percent)
                .map(|p| format!(" ({:.0}%)", p))
                .unwrap_or_default();
            output::info(&format!("Status: {}{}", phase, percent));
            output::info("Run with --wait to poll until complete");
        }
    }
    Ok(())
}
