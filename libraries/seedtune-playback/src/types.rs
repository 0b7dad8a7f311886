//! Core types for playback management

use seedtune_core::Track;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Empty,

    /// Preview resource being acquired
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl PlaybackState {
    /// Whether a track is attached (loading, playing or paused)
    pub fn has_track(self) -> bool {
        !matches!(self, PlaybackState::Empty)
    }
}

/// Configuration for the playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Clamp seek targets to the known duration (default: true)
    pub clamp_seek: bool,

    /// Buffered commands before senders wait (default: 32)
    pub command_capacity: usize,

    /// Buffered events per subscriber before lagging (default: 64)
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            clamp_seek: true,
            command_capacity: 32,
            event_capacity: 64,
        }
    }
}

/// Observable view of the session
///
/// Published after every state mutation. UI code binds to this instead of
/// touching the manager.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Track attached to the session
    pub current_track: Option<Track>,

    /// Session state
    pub state: PlaybackState,

    /// Last reported position in milliseconds
    pub position_ms: u64,

    /// Last reported duration in milliseconds (0 until the first tick)
    pub duration_ms: u64,

    /// Full-screen player presentation flag
    pub is_full_screen: bool,

    /// Queued tracks (empty for single-track playback)
    pub queue: Arc<Vec<Track>>,

    /// Cursor into `queue`
    pub cursor: Option<usize>,

    /// Load generation of the current sound
    pub generation: u64,
}

impl SessionSnapshot {
    /// Whether audio is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether the session is empty
    pub fn is_empty(&self) -> bool {
        self.state == PlaybackState::Empty
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            current_track: None,
            state: PlaybackState::Empty,
            position_ms: 0,
            duration_ms: 0,
            is_full_screen: false,
            queue: Arc::new(Vec::new()),
            cursor: None,
            generation: 0,
        }
    }
}
