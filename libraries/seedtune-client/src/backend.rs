//! Recommendation backend client.
//!
//! Custom playlists, liked songs, recommendation history and stored
//! recommendation results.

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::http::{encode, expect_success, read_json, Transport};
use crate::types::{
    NewPlaylist, PlaylistEntry, PlaylistTrackRecord, RecommendationTrackRecord, RenamePlaylist,
};
use seedtune_core::{Playlist, Recommendation, Track, LIKED_PLAYLIST_ID};
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the Seedtune backend REST API.
#[derive(Clone)]
pub struct BackendClient {
    transport: Transport,
}

impl BackendClient {
    /// Create a client for the backend at `config.base_url`.
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config, credentials)?,
        })
    }

    /// Backend base URL.
    pub fn url(&self) -> &str {
        self.transport.base_url()
    }

    // ===== Playlists =====

    /// Playlists owned by `user_id`.
    pub async fn playlists(&self, user_id: &str) -> Result<Vec<Playlist>> {
        let url = self.transport.url(&format!("/api/playlist/{}", encode(user_id)));
        debug!(url = %url, "Fetching playlists");

        let response = self.transport.send(|http| http.get(&url)).await?;
        let playlists: Vec<Playlist> = read_json(response, "playlists").await?;

        debug!(count = playlists.len(), "Fetched playlists");
        Ok(playlists)
    }

    /// One playlist's metadata.
    pub async fn playlist(&self, playlist_id: i64) -> Result<Playlist> {
        let url = self.transport.url(&format!("/api/playlist/detail/{playlist_id}"));
        debug!(url = %url, "Fetching playlist");

        let response = self.transport.send(|http| http.get(&url)).await?;
        read_json(response, "playlist").await
    }

    /// Create a playlist.
    pub async fn create_playlist(&self, user_id: &str, title: &str) -> Result<()> {
        let url = self.transport.url("/api/playlist/create");
        let body = NewPlaylist {
            user_id: user_id.to_string(),
            title: title.to_string(),
            thumbnail_url: None,
        };

        let response = self.transport.send(|http| http.post(&url).json(&body)).await?;
        expect_success(response).await?;

        info!(title = %title, "Created playlist");
        Ok(())
    }

    /// Rename a playlist.
    pub async fn rename_playlist(&self, playlist_id: i64, title: &str) -> Result<()> {
        let url = self.transport.url(&format!("/api/playlist/{playlist_id}"));
        let body = RenamePlaylist {
            title: title.to_string(),
        };

        let response = self.transport.send(|http| http.put(&url).json(&body)).await?;
        expect_success(response).await
    }

    /// Delete a playlist.
    pub async fn delete_playlist(&self, playlist_id: i64) -> Result<()> {
        let url = self.transport.url(&format!("/api/playlist/{playlist_id}"));

        let response = self.transport.send(|http| http.delete(&url)).await?;
        expect_success(response).await?;

        info!(playlist_id, "Deleted playlist");
        Ok(())
    }

    /// Tracks stored in a playlist, with their row ids.
    pub async fn playlist_tracks(&self, playlist_id: i64) -> Result<Vec<PlaylistEntry>> {
        let url = self.transport.url(&format!("/api/playlist/{playlist_id}/tracks"));
        debug!(url = %url, "Fetching playlist tracks");

        let response = self.transport.send(|http| http.get(&url)).await?;
        let records: Vec<PlaylistTrackRecord> = read_json(response, "playlist tracks").await?;

        Ok(records.into_iter().map(PlaylistEntry::from).collect())
    }

    /// Add a track to a playlist.
    pub async fn add_track(&self, playlist_id: i64, track: &Track) -> Result<()> {
        let url = self.transport.url("/api/playlist/track/save");
        let body = PlaylistTrackRecord::from_track(playlist_id, track);

        let response = self.transport.send(|http| http.post(&url).json(&body)).await?;
        expect_success(response).await?;

        debug!(playlist_id, track_id = %track.id, "Added track to playlist");
        Ok(())
    }

    /// Remove a playlist entry by row id.
    pub async fn remove_track(&self, entry_id: i64, playlist_id: i64) -> Result<()> {
        let url = self.transport.url(&format!(
            "/api/playlist/track?id={entry_id}&playlistId={playlist_id}"
        ));

        let response = self.transport.send(|http| http.delete(&url)).await?;
        expect_success(response).await
    }

    // ===== Likes =====

    /// Liked songs (the reserved playlist).
    pub async fn liked_tracks(&self) -> Result<Vec<PlaylistEntry>> {
        self.playlist_tracks(LIKED_PLAYLIST_ID).await
    }

    /// Like a track.
    pub async fn like_track(&self, track: &Track) -> Result<()> {
        self.add_track(LIKED_PLAYLIST_ID, track).await
    }

    /// Remove a liked-songs entry.
    pub async fn unlike_track(&self, entry_id: i64) -> Result<()> {
        self.remove_track(entry_id, LIKED_PLAYLIST_ID).await
    }

    // ===== History =====

    /// Recommendation history of `user_id`.
    pub async fn history(&self, user_id: &str) -> Result<Vec<Recommendation>> {
        let url = self.transport.url(&format!("/api/history/{}", encode(user_id)));
        debug!(url = %url, "Fetching history");

        let response = self.transport.send(|http| http.get(&url)).await?;
        read_json(response, "history").await
    }

    /// Delete a history entry.
    pub async fn delete_history(&self, recommendation_id: &str) -> Result<()> {
        let url = self
            .transport
            .url(&format!("/api/history/{}", encode(recommendation_id)));

        let response = self.transport.send(|http| http.delete(&url)).await?;
        expect_success(response).await
    }

    // ===== Recommendations =====

    /// Store a new recommendation request.
    ///
    /// Entries without seeds are rejected before anything is sent.
    pub async fn create_recommendation(&self, recommendation: &Recommendation) -> Result<()> {
        recommendation.validate()?;
        let url = self.transport.url("/api/recommendation");

        let response = self
            .transport
            .send(|http| http.post(&url).json(recommendation))
            .await?;
        expect_success(response).await?;

        info!(
            recommendation_id = %recommendation.recommendation_id,
            kind = %recommendation.recommendation_type,
            "Created recommendation"
        );
        Ok(())
    }

    /// One recommendation (its seeds).
    pub async fn recommendation(&self, recommendation_id: &str) -> Result<Recommendation> {
        let url = self
            .transport
            .url(&format!("/api/recommendation/{}", encode(recommendation_id)));

        let response = self.transport.send(|http| http.get(&url)).await?;
        read_json(response, "recommendation").await
    }

    /// Tracks stored as the result of a recommendation.
    pub async fn recommendation_tracks(&self, recommendation_id: &str) -> Result<Vec<Track>> {
        let url = self.transport.url(&format!(
            "/api/recommendation/{}/tracks",
            encode(recommendation_id)
        ));

        let response = self.transport.send(|http| http.get(&url)).await?;
        let records: Vec<RecommendationTrackRecord> =
            read_json(response, "recommendation tracks").await?;

        Ok(records.into_iter().map(Track::from).collect())
    }

    /// Store the tracks a recommendation produced.
    pub async fn save_recommendation_tracks(
        &self,
        recommendation_id: &str,
        tracks: &[Track],
    ) -> Result<()> {
        let url = self.transport.url("/api/recommendation/tracks/save");
        let body: Vec<RecommendationTrackRecord> = tracks
            .iter()
            .map(|t| RecommendationTrackRecord::from_track(recommendation_id, t))
            .collect();

        let response = self.transport.send(|http| http.post(&url).json(&body)).await?;
        expect_success(response).await?;

        debug!(recommendation_id = %recommendation_id, count = body.len(), "Saved recommendation tracks");
        Ok(())
    }
}
