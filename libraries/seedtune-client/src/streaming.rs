//! Streaming platform Web API client.
//!
//! Read-only: library playlists, track search and seeded recommendations.

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::http::{encode, read_json, Transport};
use crate::types::{
    LibraryPlaylist, Paging, PlaylistDetail, PlaylistObject, RecommendationSeeds,
    RecommendationsResponse, SearchResponse,
};
use seedtune_core::Track;
use std::sync::Arc;
use tracing::debug;

/// Default platform API base URL.
pub const DEFAULT_STREAMING_URL: &str = "https://api.spotify.com";

/// Client for the streaming platform's Web API.
#[derive(Clone)]
pub struct StreamingClient {
    transport: Transport,
}

impl StreamingClient {
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config, credentials)?,
        })
    }

    /// Playlists in the current user's library.
    pub async fn my_playlists(&self, limit: u32, offset: u32) -> Result<Vec<LibraryPlaylist>> {
        let url = self
            .transport
            .url(&format!("/v1/me/playlists?limit={limit}&offset={offset}"));
        debug!(url = %url, "Fetching library playlists");

        let response = self.transport.send(|http| http.get(&url)).await?;
        let page: Paging<PlaylistObject> = read_json(response, "playlists page").await?;

        Ok(page.items.into_iter().map(LibraryPlaylist::from).collect())
    }

    /// Tracks of a library playlist. Removed tracks are skipped.
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let url = self
            .transport
            .url(&format!("/v1/playlists/{}", encode(playlist_id)));
        debug!(url = %url, "Fetching playlist");

        let response = self.transport.send(|http| http.get(&url)).await?;
        let detail: PlaylistDetail = read_json(response, "playlist").await?;

        debug!(
            playlist = %detail.name,
            items = detail.tracks.items.len(),
            "Fetched playlist"
        );

        Ok(detail
            .tracks
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(Track::from)
            .collect())
    }

    /// Search tracks by free text.
    pub async fn search_tracks(&self, query: &str, limit: u32, offset: u32) -> Result<Vec<Track>> {
        let url = self.transport.url(&format!(
            "/v1/search?q={}&type=track&limit={limit}&offset={offset}",
            encode(query)
        ));
        debug!(query = %query, "Searching tracks");

        let response = self.transport.send(|http| http.get(&url)).await?;
        let results: SearchResponse = read_json(response, "search results").await?;

        Ok(results.tracks.items.into_iter().map(Track::from).collect())
    }

    /// Tracks recommended from the given seeds.
    pub async fn recommendations(
        &self,
        seeds: &RecommendationSeeds,
        limit: u32,
    ) -> Result<Vec<Track>> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("seed_artists", &seeds.artist_ids.join(","))
            .append_pair("seed_genres", &seeds.genres.join(","))
            .append_pair("seed_tracks", &seeds.track_ids.join(","))
            .append_pair("limit", &limit.to_string())
            .finish();
        let url = self.transport.url(&format!("/v1/recommendations?{query}"));
        debug!(seeds = seeds.len(), limit, "Fetching recommendations");

        let response = self.transport.send(|http| http.get(&url)).await?;
        let results: RecommendationsResponse = read_json(response, "recommendations").await?;

        Ok(results.tracks.into_iter().map(Track::from).collect())
    }
}
