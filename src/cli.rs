//! Command-line surface. Thin argument definitions only; the actual
//! workflows live in `commands`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yoto", version, about = "CLI for the Yoto API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to the Yoto API and manage credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Manage Yoto devices
    Device {
        #[command(subcommand)]
        command: DeviceCommands,
    },
    /// Manage MYO playlists
    Playlist {
        #[command(subcommand)]
        command: PlaylistCommands,
    },
    /// Manage playlist chapters
    Chapter {
        #[command(subcommand)]
        command: ChapterCommands,
    },
    /// Manage playlist tracks
    Track {
        #[command(subcommand)]
        command: TrackCommands,
    },
    /// Manage playlist entries (chapter + track as one unit)
    Entry {
        #[command(subcommand)]
        command: EntryCommands,
    },
    /// Manage icons
    Icon {
        #[command(subcommand)]
        command: IconCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in via the device-code flow
    Login,
    /// Forget stored credentials
    Logout,
    /// Show login status
    Status,
}

#[derive(Subcommand)]
pub enum DeviceCommands {
    /// List your Yoto devices
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get device status (playback state, volume, battery)
    Show {
        device_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start/resume playback
    Play { device_id: String },
    /// Pause playback
    Pause { device_id: String },
    /// Stop playback
    Stop { device_id: String },
    /// Skip to next track
    Next { device_id: String },
    /// Go to previous track
    Previous { device_id: String },
    /// Set volume level (0-100)
    Volume {
        device_id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },
}

#[derive(Subcommand)]
pub enum PlaylistCommands {
    /// List your MYO playlists
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get playlist details including chapters and tracks
    Show {
        card_id: String,
        /// Include playable URLs for tracks
        #[arg(long)]
        playable: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new empty playlist
    Create {
        title: String,
        /// Set playlist description
        #[arg(long)]
        description: Option<String>,
        /// Set playlist author
        #[arg(long)]
        author: Option<String>,
    },
    /// Edit playlist properties (title, description, author)
    Edit {
        card_id: String,
        /// Update playlist title
        #[arg(long)]
        title: Option<String>,
        /// Update playlist description
        #[arg(long)]
        description: Option<String>,
        /// Update playlist author
        #[arg(long)]
        author: Option<String>,
        /// Update playback type (e.g., linear)
        #[arg(long = "playback-type")]
        playback_type: Option<String>,
    },
    /// Delete a playlist
    Delete { card_id: String },
}

#[derive(Subcommand)]
pub enum ChapterCommands {
    /// Add a new chapter to a playlist
    Add {
        card_id: String,
        title: String,
        /// Set chapter icon (file path, mediaId, or yoto:#mediaId)
        #[arg(long)]
        icon: Option<String>,
        /// Audio file to upload and add as a track
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a chapter's title or icon
    Edit {
        card_id: String,
        /// Chapter index (0-based)
        chapter_idx: usize,
        /// Update chapter title
        #[arg(long)]
        title: Option<String>,
        /// Update chapter icon (file path, mediaId, or yoto:#mediaId)
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a chapter from a playlist
    Delete {
        card_id: String,
        /// Chapter index (0-based)
        chapter_idx: usize,
    },
}

#[derive(Subcommand)]
pub enum TrackCommands {
    /// Add a new track to a chapter
    Add {
        card_id: String,
        /// Chapter index (0-based)
        chapter_idx: usize,
        title: String,
        /// File path, URL, or yoto:# hash
        source: String,
        /// Set track icon (file path, mediaId, or yoto:#mediaId)
        #[arg(long)]
        icon: Option<String>,
        /// Set track duration in seconds (auto-detected for uploads)
        #[arg(long)]
        duration: Option<u64>,
    },
    /// Update a track's properties (title, icon, URL, playback behavior)
    Edit {
        card_id: String,
        /// Chapter index (0-based)
        chapter_idx: usize,
        /// Track index within chapter (0-based)
        track_idx: usize,
        /// Update track title
        #[arg(long)]
        title: Option<String>,
        /// Update track icon (file path, mediaId, or yoto:#mediaId)
        #[arg(long)]
        icon: Option<String>,
        /// Update track URL
        #[arg(long)]
        url: Option<String>,
        /// Action when track ends: none (continue), stop (pause), repeat (loop)
        #[arg(long = "on-end")]
        on_end: Option<String>,
    },
    /// Delete a track from a chapter
    Delete {
        card_id: String,
        /// Chapter index (0-based)
        chapter_idx: usize,
        /// Track index within chapter (0-based)
        track_idx: usize,
    },
    /// Upload an audio file and get a track URL (yoto:# hash)
    Upload {
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Don't wait for transcoding to complete
        #[arg(long = "no-wait")]
        no_wait: bool,
    },
    /// Check transcoding status for an uploaded audio file
    Status {
        upload_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Wait for transcoding to complete
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add a new entry (chapter with audio track) to a playlist
    Add {
        card_id: String,
        /// The entry title (used for both chapter and track)
        title: String,
        /// Audio file to upload (required)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Set icon (file path, mediaId, or yoto:#mediaId)
        #[arg(long)]
        icon: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update an entry's title or icon (updates both chapter and track)
    Update {
        card_id: String,
        /// Entry index (0-based)
        entry_idx: usize,
        /// Update title
        #[arg(long)]
        title: Option<String>,
        /// Update icon (file path, mediaId, or yoto:#mediaId)
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete an entry from a playlist
    Delete {
        card_id: String,
        /// Entry index (0-based)
        entry_idx: usize,
    },
}

#[derive(Subcommand)]
pub enum IconCommands {
    /// List icons (public or your own)
    List {
        /// List only your uploaded custom icons
        #[arg(long)]
        mine: bool,
        /// Filter public icons by tag (e.g., music, animals)
        #[arg(long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a custom icon image
    Upload {
        file: PathBuf,
        /// Skip auto-resize (image must be exactly 16x16 PNG)
        #[arg(long = "no-convert")]
        no_convert: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
