// End-to-end entry workflow against the in-memory API double.
// Run with: cargo test --features test-utils

use yoto_cli::commands::entry::{self, AddOptions};
use yoto_cli::media::hash::sha256_hex;
use yoto_cli::test_support::{empty_card, MockYotoApi};
use yoto_cli::YotoApi;

#[tokio::test]
async fn test_entry_lifecycle_add_update_delete() {
    let api = MockYotoApi::new();
    api.insert_card(empty_card("5ukMR", "Bedtime"));

    let dir = tempfile::tempdir().unwrap();
    let audio = b"one whole story, as bytes";
    let file = dir.path().join("story.mp3");
    std::fs::write(&file, audio).unwrap();

    // Add: one new chapter with exactly one track, titles matching, track
    // URL carrying the transcoded content hash.
    entry::add(
        &api,
        "5ukMR",
        "Goodnight Moon",
        AddOptions {
            file: Some(file.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let card = api.get_content("5ukMR", false).await.unwrap();
    assert_eq!(card.content.chapters.len(), 1);
    let chapter = &card.content.chapters[0];
    assert_eq!(chapter.tracks.len(), 1);
    assert_eq!(chapter.title, "Goodnight Moon");
    assert_eq!(chapter.tracks[0].title, "Goodnight Moon");
    assert_eq!(
        chapter.tracks[0].track_url.as_deref(),
        Some(format!("yoto:#{}", sha256_hex(audio)).as_str())
    );

    // Re-adding identical bytes dedups server-side: no second byte PUT.
    entry::add(
        &api,
        "5ukMR",
        "Goodnight Again",
        AddOptions {
            file: Some(file),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(api.audio_put_count(), 1);

    // Update with only an icon: display changes on chapter and tracks,
    // titles stay put.
    entry::update(&api, "5ukMR", 0, None, Some("yoto:#fresh".to_string()))
        .await
        .unwrap();
    let card = api.get_content("5ukMR", false).await.unwrap();
    let chapter = &card.content.chapters[0];
    assert_eq!(chapter.title, "Goodnight Moon");
    assert_eq!(
        chapter.display.as_ref().unwrap().icon_16x16.as_deref(),
        Some("yoto:#fresh")
    );
    assert_eq!(
        chapter.tracks[0]
            .display
            .as_ref()
            .unwrap()
            .icon_16x16
            .as_deref(),
        Some("yoto:#fresh")
    );

    // Delete shifts the remaining entry down into position 0.
    entry::delete(&api, "5ukMR", 0).await.unwrap();
    let card = api.get_content("5ukMR", false).await.unwrap();
    assert_eq!(card.content.chapters.len(), 1);
    assert_eq!(card.content.chapters[0].title, "Goodnight Again");
}

#[tokio::test]
async fn test_entry_add_with_injected_default_icon() {
    let api = MockYotoApi::new();
    api.insert_card(empty_card("c1", "List"));

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.mp3");
    std::fs::write(&file, b"audio").unwrap();

    entry::add(
        &api,
        "c1",
        "Entry",
        AddOptions {
            file: Some(file),
            default_icon: Some("injected-default".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let card = api.get_content("c1", false).await.unwrap();
    assert_eq!(
        card.content.chapters[0]
            .display
            .as_ref()
            .unwrap()
            .icon_16x16
            .as_deref(),
        Some("yoto:#injected-default")
    );
}
