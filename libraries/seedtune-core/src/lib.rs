//! Seedtune Core
//!
//! Platform-agnostic domain types shared by the playback session, the REST
//! clients and the command-line application.
//!
//! # Example
//!
//! ```rust
//! use seedtune_core::{playable_tracks, AlbumRef, ArtistRef, Track};
//!
//! let track = Track::new("4uLU6hMCjMI75M1A2tKUQC", "Never Gonna Give You Up", 213_573)
//!     .with_artist(ArtistRef::new("0gxyHStUsqpMadRV0Di1Qt", "Rick Astley"))
//!     .with_album(AlbumRef::new("6N9PS4QXF1D0OWPk0Sxtb4", "Whenever You Need Somebody"))
//!     .with_preview_url("https://p.scdn.co/mp3-preview/abc");
//!
//! assert!(track.is_playable());
//! assert_eq!(playable_tracks(vec![track]).len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{Result, SeedtuneError};
pub use types::{
    playable_tracks, AlbumRef, ArtistRef, Playlist, Recommendation, RecommendationKind, Track,
    LIKED_PLAYLIST_ID,
};
