//! Track domain type
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Artist descriptor attached to a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    /// Streaming-platform artist identifier
    pub id: String,

    /// Display name
    pub name: String,
}

impl ArtistRef {
    /// Create a new artist descriptor
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Album descriptor attached to a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    /// Album identifier
    pub id: String,

    /// Album name
    pub name: String,

    /// Album art URL (largest image first)
    pub image_url: Option<String>,
}

impl AlbumRef {
    /// Create a new album descriptor without artwork
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: None,
        }
    }

    /// Attach an artwork URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// A single playable audio item
///
/// Tracks are normalized from streaming-platform and backend responses into
/// this one shape before they reach the playback session. They are never
/// mutated afterwards; the session holds clones while queued or playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier (unique within a session)
    pub id: String,

    /// Track title
    pub title: String,

    /// Credited artists, in display order
    pub artists: Vec<ArtistRef>,

    /// Album the track belongs to
    pub album: Option<AlbumRef>,

    /// URL of the short preview clip (some tracks have none)
    pub preview_url: Option<String>,

    /// Full track duration in milliseconds
    pub duration_ms: u64,
}

impl Track {
    /// Create a track with minimal metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artists: Vec::new(),
            album: None,
            preview_url: None,
            duration_ms,
        }
    }

    /// Append an artist
    pub fn with_artist(mut self, artist: ArtistRef) -> Self {
        self.artists.push(artist);
        self
    }

    /// Set the album
    pub fn with_album(mut self, album: AlbumRef) -> Self {
        self.album = Some(album);
        self
    }

    /// Set the preview URL
    pub fn with_preview_url(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self
    }

    /// Preview URL, treating an empty string as absent
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Whether this track can be handed to the audio engine
    pub fn is_playable(&self) -> bool {
        self.preview_url().is_some()
    }

    /// Artist names joined for display ("A, B")
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Album art URL, if any
    pub fn album_image_url(&self) -> Option<&str> {
        self.album.as_ref().and_then(|a| a.image_url.as_deref())
    }

    /// Duration as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Keep only tracks with a usable preview, preserving order
///
/// The playback session does not filter queues itself; callers run lists
/// through this before `play_track_list`.
pub fn playable_tracks(tracks: impl IntoIterator<Item = Track>) -> Vec<Track> {
    tracks.into_iter().filter(Track::is_playable).collect()
}
