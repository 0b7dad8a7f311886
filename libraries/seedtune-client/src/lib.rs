//! Seedtune Client
//!
//! HTTP clients for the two REST boundaries the app consumes.
//!
//! # Features
//!
//! - **Backend**: custom playlists, liked songs, recommendation history,
//!   stored recommendation results
//! - **Streaming platform**: library playlists, track search, seeded
//!   recommendations
//! - **Credentials**: bearer tokens with refresh through the backend
//!
//! Every track coming back from either side is normalized into
//! [`seedtune_core::Track`].
//!
//! # Example
//!
//! ```ignore
//! use seedtune_client::{BackendClient, ClientConfig, StaticCredentials};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Arc::new(StaticCredentials::new("token"));
//!     let backend = BackendClient::new(&ClientConfig::new("https://api.seedtune.app"), credentials)?;
//!
//!     for entry in backend.liked_tracks().await? {
//!         println!("{} - {}", entry.track.artist_names(), entry.track.title);
//!     }
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod credentials;
mod error;
mod http;
mod streaming;
mod types;

pub use backend::BackendClient;
pub use config::ClientConfig;
pub use credentials::{
    CredentialProvider, RefreshingCredentials, StaticCredentials, Tokens,
    DEFAULT_TOKEN_LIFETIME_SECS,
};
pub use error::{ClientError, Result};
pub use streaming::{StreamingClient, DEFAULT_STREAMING_URL};
pub use types::{
    LibraryPlaylist, PlaylistEntry, PlaylistTrackRecord, RecommendationSeeds,
    RecommendationTrackRecord, RefreshResponse, TrackObject, MAX_SEEDS,
};
