use crate::api::models::{Content, ContentMetadata, ContentRequest};
use crate::api::YotoApi;
use crate::commands::{format_duration, write_back_request, CommandError};
use crate::output;

#[derive(Debug, Default)]
pub struct EditOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub playback_type: Option<String>,
}

pub async fn list<A: YotoApi + ?Sized>(api: &A, json: bool) -> Result<(), CommandError> {
    let response = api.list_content().await?;

    if json {
        output::json(&response.cards);
        return Ok(());
    }

    if response.cards.is_empty() {
        output::info("No playlists found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = response
        .cards
        .iter()
        .map(|card| {
            vec![
                card.title.clone(),
                card.card_id.clone(),
                card.updated_at
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    output::table(&["Title", "Card ID", "Updated"], &rows);
    Ok(())
}

pub async fn show<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    playable: bool,
    json: bool,
) -> Result<(), CommandError> {
    let card = api.get_content(card_id, playable).await?;

    if json {
        output::json(&card);
        return Ok(());
    }

    output::info(&format!("\nTitle: {}", card.title));
    output::info(&format!("Card ID: {}", card.card_id));
    if let Some(author) = card.metadata.as_ref().and_then(|m| m.author.as_deref()) {
        output::info(&format!("Author: {}", author));
    }
    if let Some(description) = card
        .metadata
        .as_ref()
        .and_then(|m| m.description.as_deref())
    {
        output::info(&format!("Description: {}", description));
    }

    output::info(&format!("\nChapters ({}):", card.content.chapters.len()));
    for (i, chapter) in card.content.chapters.iter().enumerate() {
        output::info(&format!("\n  {}. {}", i + 1, chapter.title));
        if let Some(icon) = &chapter.icon {
            output::info(&format!("     Icon: {}", icon));
        }
        output::info(&format!("     Tracks ({}):", chapter.tracks.len()));
        for (j, track) in chapter.tracks.iter().enumerate() {
            let duration = track
                .duration
                .map(|d| format!(" ({})", format_duration(d)))
                .unwrap_or_default();
            output::info(&format!("       {}. {}{}", j + 1, track.title, duration));
            if let Some(url) = &track.track_url {
                output::info(&format!("          URL: {}", url));
            }
        }
    }
    Ok(())
}

pub async fn create<A: YotoApi + ?Sized>(
    api: &A,
    title: &str,
    description: Option<String>,
    author: Option<String>,
) -> Result<(), CommandError> {
    let request = ContentRequest {
        card_id: None,
        title: title.to_string(),
        content: Content {
            playback_type: Some("linear".to_string()),
            ..Default::default()
        },
        metadata: Some(ContentMetadata {
            description,
            author,
            ..Default::default()
        }),
    };

    let card = api.create_content(&request).await?;
    output::success(&format!("Created playlist: {}", card.title));
    output::info(&format!("Card ID: {}", card.card_id));
    Ok(())
}

pub async fn edit<A: YotoApi + ?Sized>(
    api: &A,
    card_id: &str,
    options: EditOptions,
) -> Result<(), CommandError> {
    let mut card = api.get_content(card_id, false).await?;

    if let Some(title) = options.title {
        card.title = title;
    }
    if options.description.is_some() || options.author.is_some() {
        let metadata = card.metadata.get_or_insert_with(Default::default);
        if let Some(description) = options.description {
            metadata.description = Some(description);
        }
        if let Some(author) = options.author {
            metadata.author = Some(author);
        }
    }
    if let Some(playback_type) = options.playback_type {
        card.content.playback_type = Some(playback_type);
    }

    api.update_content(card_id, &write_back_request(&card)).await?;
    output::success(&format!("Updated playlist \"{}\"", card.title));
    Ok(())
}

pub async fn delete<A: YotoApi + ?Sized>(api: &A, card_id: &str) -> Result<(), CommandError> {
    api.delete_content(card_id).await?;
    output::success(&format!("Deleted playlist: {}", card_id));
    Ok(())
}

fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
