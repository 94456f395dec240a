//! In-memory mutations on a fetched card document.
//!
//! The remote API has no partial-patch operation: every edit is a full
//! fetch, a list mutation here, and a full write-back. Chapters and tracks
//! have no identity beyond their position, so all addressing is by index
//! as of fetch time. There is no optimistic-concurrency token; the last
//! write wins.

use crate::api::models::{Chapter, Content, Display, Track, yoto_uri};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Chapter {0} not found. Use 0-based index")]
    ChapterNotFound(usize),
    #[error("Track {0} not found. Use 0-based index")]
    TrackNotFound(usize),
}

impl Content {
    /// Key for the next appended chapter: the zero-padded current length.
    pub fn next_chapter_key(&self) -> String {
        format!("{:02}", self.chapters.len())
    }

    pub fn chapter(&self, index: usize) -> Result<&Chapter, EditError> {
        self.chapters
            .get(index)
            .ok_or(EditError::ChapterNotFound(index))
    }

    pub fn chapter_mut(&mut self, index: usize) -> Result<&mut Chapter, EditError> {
        self.chapters
            .get_mut(index)
            .ok_or(EditError::ChapterNotFound(index))
    }

    pub fn push_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Splice out a chapter; later chapters shift down by one.
    pub fn remove_chapter(&mut self, index: usize) -> Result<Chapter, EditError> {
        if index >= self.chapters.len() {
            return Err(EditError::ChapterNotFound(index));
        }
        Ok(self.chapters.remove(index))
    }
}

impl Chapter {
    /// Key for the next appended track: one-based, zero-padded.
    pub fn next_track_key(&self) -> String {
        format!("{:02}", self.tracks.len() + 1)
    }

    pub fn track_mut(&mut self, index: usize) -> Result<&mut Track, EditError> {
        self.tracks
            .get_mut(index)
            .ok_or(EditError::TrackNotFound(index))
    }

    /// Splice out a track; later tracks shift down by one.
    pub fn remove_track(&mut self, index: usize) -> Result<Track, EditError> {
        if index >= self.tracks.len() {
            return Err(EditError::TrackNotFound(index));
        }
        Ok(self.tracks.remove(index))
    }

    /// Set the chapter icon, keeping the bare media id and the display
    /// reference in sync.
    pub fn set_icon(&mut self, media_id: &str) {
        self.icon = Some(media_id.to_string());
        self.display
            .get_or_insert_with(Display::default)
            .icon_16x16 = Some(yoto_uri(media_id));
    }
}

impl Track {
    /// Set the track's 16x16 display icon reference.
    pub fn set_display_icon(&mut self, media_id: &str) {
        self.display
            .get_or_insert_with(Display::default)
            .icon_16x16 = Some(yoto_uri(media_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_with_chapters(count: usize) -> Content {
        let mut content = Content::default();
        for i in 0..count {
            content.push_chapter(Chapter {
                key: format!("{:02}", i),
                title: format!("Chapter {}", i),
                ..Default::default()
            });
        }
        content
    }

    #[test]
    fn test_next_keys_are_zero_padded() {
        let content = content_with_chapters(3);
        assert_eq!(content.next_chapter_key(), "03");

        let mut chapter = Chapter::default();
        assert_eq!(chapter.next_track_key(), "01");
        chapter.tracks.push(Track::default());
        assert_eq!(chapter.next_track_key(), "02");
    }

    #[test]
    fn test_remove_chapter_shifts_later_positions_down() {
        let mut content = content_with_chapters(4);
        let removed = content.remove_chapter(1).unwrap();

        assert_eq!(removed.title, "Chapter 1");
        assert_eq!(content.chapters.len(), 3);
        // The chapter after the removed one now sits at its position.
        assert_eq!(content.chapters[1].title, "Chapter 2");
        assert_eq!(content.chapters[2].title, "Chapter 3");
    }

    #[test]
    fn test_remove_chapter_out_of_range() {
        let mut content = content_with_chapters(2);
        match content.remove_chapter(2) {
            Err(EditError::ChapterNotFound(2)) => {}
            other => panic!("expected ChapterNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_track_shifts_later_positions_down() {
        let mut chapter = Chapter::default();
        for i in 0..3 {
            chapter.tracks.push(Track {
                key: format!("{:02}", i + 1),
                title: format!("Track {}", i),
                ..Default::default()
            });
        }

        let removed = chapter.remove_track(0).unwrap();
        assert_eq!(removed.title, "Track 0");
        assert_eq!(chapter.tracks.len(), 2);
        assert_eq!(chapter.tracks[0].title, "Track 1");
    }

    #[test]
    fn test_set_icon_keeps_both_fields_in_sync() {
        let mut chapter = Chapter::default();
        chapter.set_icon("media-1");
        assert_eq!(chapter.icon.as_deref(), Some("media-1"));
        assert_eq!(
            chapter.display.unwrap().icon_16x16.as_deref(),
            Some("yoto:#media-1")
        );
    }
}
