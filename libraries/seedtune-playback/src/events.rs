//! Playback events
//!
//! Broadcast alongside the snapshot stream for consumers that care about
//! transitions rather than state (track analytics, error toasts, logging).

use crate::types::PlaybackState;
use serde::Serialize;

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// Session state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A new track was attached to the session
    TrackChanged {
        /// ID of the new track
        track_id: String,
        /// ID of the track it replaced (if any)
        previous_track_id: Option<String>,
    },

    /// Track reached its natural end
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Position reported by the engine
    PositionUpdate {
        /// Current position in milliseconds
        position_ms: u64,
        /// Total duration in milliseconds
        duration_ms: u64,
    },

    /// Queue replaced or cleared
    QueueChanged {
        /// Number of queued tracks
        length: usize,
        /// Cursor into the queue
        cursor: Option<usize>,
    },

    /// Full-screen player toggled
    FullScreenChanged {
        /// New flag value
        is_full_screen: bool,
    },

    /// The last queued track finished and playback was cleared
    QueueEnded,

    /// A command failed in the engine
    Error {
        /// Error message
        message: String,
    },
}
