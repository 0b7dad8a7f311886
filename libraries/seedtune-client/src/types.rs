//! Wire types for the backend and streaming-platform APIs.
//!
//! Both boundaries describe tracks differently. Everything here converts into
//! [`seedtune_core::Track`] so the rest of the app sees one shape.

use seedtune_core::{AlbumRef, ArtistRef, Recommendation, Track};
use serde::{Deserialize, Serialize};

// =============================================================================
// Backend Types
// =============================================================================

/// Track row stored in a backend playlist.
///
/// Artists are kept comma-joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrackRecord {
    /// Row id, needed to remove the entry again
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub playlist_id: i64,
    pub track_id: String,
    pub title: String,
    #[serde(default)]
    pub artist_ids: String,
    #[serde(default)]
    pub artist_names: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub album_image_url: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl PlaylistTrackRecord {
    /// Request body for `POST /api/playlist/track/save`.
    pub fn from_track(playlist_id: i64, track: &Track) -> Self {
        let (artist_ids, artist_names) = join_artists(&track.artists);
        Self {
            id: None,
            playlist_id,
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist_ids,
            artist_names,
            preview_url: track.preview_url().map(str::to_string),
            album_image_url: track.album_image_url().map(str::to_string),
            duration_ms: track.duration_ms,
        }
    }
}

impl From<PlaylistTrackRecord> for Track {
    fn from(record: PlaylistTrackRecord) -> Self {
        build_track(
            record.track_id,
            record.title,
            &record.artist_ids,
            &record.artist_names,
            record.preview_url,
            record.album_image_url,
            record.duration_ms,
        )
    }
}

/// A track inside a backend playlist, with the row id used for removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Row id (`id` query parameter of the delete call)
    pub entry_id: i64,
    /// Owning playlist
    pub playlist_id: i64,
    /// Normalized track
    pub track: Track,
}

impl From<PlaylistTrackRecord> for PlaylistEntry {
    fn from(record: PlaylistTrackRecord) -> Self {
        Self {
            entry_id: record.id.unwrap_or_default(),
            playlist_id: record.playlist_id,
            track: record.into(),
        }
    }
}

/// Track row stored as the result of a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationTrackRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub recommendation_id: String,
    pub track_id: String,
    pub title: String,
    #[serde(default)]
    pub artist_ids: String,
    #[serde(default)]
    pub artist_names: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub album_image_url: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl RecommendationTrackRecord {
    /// Row for `POST /api/recommendation/tracks/save`.
    pub fn from_track(recommendation_id: &str, track: &Track) -> Self {
        let (artist_ids, artist_names) = join_artists(&track.artists);
        Self {
            id: None,
            recommendation_id: recommendation_id.to_string(),
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist_ids,
            artist_names,
            preview_url: track.preview_url().map(str::to_string),
            album_image_url: track.album_image_url().map(str::to_string),
            duration_ms: track.duration_ms,
        }
    }
}

impl From<RecommendationTrackRecord> for Track {
    fn from(record: RecommendationTrackRecord) -> Self {
        build_track(
            record.track_id,
            record.title,
            &record.artist_ids,
            &record.artist_names,
            record.preview_url,
            record.album_image_url,
            record.duration_ms,
        )
    }
}

/// Body for `POST /api/playlist/create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylist {
    pub user_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Body for `PUT /api/playlist/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct RenamePlaylist {
    pub title: String,
}

/// Body for `POST /api/auth/refresh`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
    pub spotify_id: String,
}

/// Token pair returned by `POST /api/auth/refresh`.
///
/// The refresh token is only present when it was rotated.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds, when the platform reports it
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// =============================================================================
// Streaming Platform Types
// =============================================================================

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageObject {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

/// Track as returned by the streaming platform.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    #[serde(default)]
    pub album: Option<AlbumObject>,
}

impl From<TrackObject> for Track {
    fn from(object: TrackObject) -> Self {
        let mut track = Track::new(object.id, object.name, object.duration_ms);
        track.artists = object
            .artists
            .into_iter()
            .map(|a| ArtistRef::new(a.id, a.name))
            .collect();
        track.album = object.album.map(|album| {
            let image = album.images.into_iter().next().map(|i| i.url);
            let album_ref = AlbumRef::new(album.id, album.name);
            match image {
                Some(url) => album_ref.with_image(url),
                None => album_ref,
            }
        });
        track.preview_url = object.preview_url;
        track
    }
}

/// Library playlist owned or followed by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ImageObject>>,
    #[serde(default)]
    pub tracks: Option<TracksRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracksRef {
    #[serde(default)]
    pub total: u32,
}

/// Streaming-platform playlist summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPlaylist {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub total_tracks: u32,
}

impl From<PlaylistObject> for LibraryPlaylist {
    fn from(object: PlaylistObject) -> Self {
        Self {
            id: object.id,
            name: object.name,
            image_url: object
                .images
                .and_then(|images| images.into_iter().next())
                .map(|i| i.url),
            total_tracks: object.tracks.map(|t| t.total).unwrap_or_default(),
        }
    }
}

/// `item` wrapper of a playlist's track list. Removed tracks come back as null.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
}

/// `GET /v1/playlists/{id}` response (only the parts we read).
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistDetail {
    pub id: String,
    pub name: String,
    pub tracks: Paging<PlaylistItem>,
}

/// `GET /v1/search?type=track` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<TrackObject>,
}

/// `GET /v1/recommendations` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<TrackObject>,
}

/// Seeds for a recommendation request.
///
/// The platform accepts at most five seeds in total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationSeeds {
    pub track_ids: Vec<String>,
    pub artist_ids: Vec<String>,
    pub genres: Vec<String>,
}

/// Seed limit across all three kinds
pub const MAX_SEEDS: usize = 5;

impl RecommendationSeeds {
    /// Seeds from a stored recommendation.
    ///
    /// Tracks take priority, then artists, then genres, until five seeds are
    /// used.
    pub fn from_recommendation(recommendation: &Recommendation) -> Self {
        let mut remaining = MAX_SEEDS;
        let mut take = |ids: Vec<&str>| -> Vec<String> {
            let picked: Vec<String> = ids.into_iter().take(remaining).map(String::from).collect();
            remaining -= picked.len();
            picked
        };

        let track_ids = take(recommendation.seed_track_ids());
        let artist_ids = take(recommendation.seed_artist_ids());
        let genres = take(recommendation.seed_genres());

        Self {
            track_ids,
            artist_ids,
            genres,
        }
    }

    /// Total number of seeds
    pub fn len(&self) -> usize {
        self.track_ids.len() + self.artist_ids.len() + self.genres.len()
    }

    /// Whether no seed is set
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn join_artists(artists: &[ArtistRef]) -> (String, String) {
    let ids = artists.iter().map(|a| a.id.as_str()).collect::<Vec<_>>().join(",");
    let names = artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(",");
    (ids, names)
}

fn split_artists(ids: &str, names: &str) -> Vec<ArtistRef> {
    if ids.trim().is_empty() {
        return Vec::new();
    }

    let mut names = names.split(',').map(str::trim);
    ids.split(',')
        .map(str::trim)
        .map(|id| ArtistRef::new(id, names.next().unwrap_or_default()))
        .collect()
}

fn build_track(
    id: String,
    title: String,
    artist_ids: &str,
    artist_names: &str,
    preview_url: Option<String>,
    album_image_url: Option<String>,
    duration_ms: u64,
) -> Track {
    let mut track = Track::new(id, title, duration_ms);
    track.artists = split_artists(artist_ids, artist_names);
    track.album = album_image_url
        .filter(|url| !url.is_empty())
        .map(|url| AlbumRef::new("", "").with_image(url));
    track.preview_url = preview_url;
    track
}
