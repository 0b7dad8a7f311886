//! Domain types

mod playlist;
mod recommendation;
mod track;

pub use playlist::{Playlist, LIKED_PLAYLIST_ID};
pub use recommendation::{Recommendation, RecommendationKind};
pub use track::{playable_tracks, AlbumRef, ArtistRef, Track};
