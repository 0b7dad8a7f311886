//! Backend playlist type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist id the backend reserves for the user's liked songs
pub const LIKED_PLAYLIST_ID: i64 = 0;

/// Custom playlist persisted by the recommendation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Backend playlist id
    pub id: i64,

    /// Owner (streaming-platform user id)
    pub user_id: String,

    /// Playlist title
    pub title: String,

    /// Cover image (artwork of the first track, usually)
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub create_dt: Option<DateTime<Utc>>,

    /// Number of tracks stored in the playlist
    #[serde(default)]
    pub total_tracks: u32,
}

impl Playlist {
    /// Whether this is the reserved liked-songs playlist
    pub fn is_liked_songs(&self) -> bool {
        self.id == LIKED_PLAYLIST_ID
    }
}
