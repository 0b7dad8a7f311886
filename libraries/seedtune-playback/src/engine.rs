//! Platform audio engine abstraction
//!
//! The session never decodes audio itself. Platform code (a mobile audio
//! session bridge, a desktop output, or the [`SilentEngine`](crate::SilentEngine))
//! implements these traits and the manager drives them.

use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Status tick reported by a loaded sound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStatus {
    /// Current position in milliseconds
    pub position_ms: u64,

    /// Total clip duration in milliseconds
    pub duration_ms: u64,

    /// Whether the resource is still loaded
    pub is_loaded: bool,

    /// Set once, on the tick where the clip reached its natural end
    pub did_just_finish: bool,
}

impl EngineStatus {
    /// A regular progress tick
    pub fn progress(position_ms: u64, duration_ms: u64) -> Self {
        Self {
            position_ms,
            duration_ms,
            is_loaded: true,
            did_just_finish: false,
        }
    }

    /// The end-of-clip tick
    pub fn finished(duration_ms: u64) -> Self {
        Self {
            position_ms: duration_ms,
            duration_ms,
            is_loaded: true,
            did_just_finish: true,
        }
    }
}

/// Receiving half of a sound's status subscription
///
/// Dropping it unsubscribes.
pub type StatusStream = mpsc::UnboundedReceiver<EngineStatus>;

/// Audio engine: turns a preview URL into a playing sound
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Load the resource at `url` and start playing it immediately
    ///
    /// # Errors
    /// Returns an error if the resource cannot be fetched, decoded or started
    async fn load(&self, url: &str) -> Result<Box<dyn Sound>>;
}

/// A loaded audio resource
///
/// Exactly one sound is owned by the playback manager at any time.
#[async_trait]
pub trait Sound: Send + Sync {
    /// Resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback, keeping the position
    async fn pause(&self) -> Result<()>;

    /// Jump to `position_ms`
    ///
    /// Out-of-range handling is up to the engine.
    async fn set_position(&self, position_ms: u64) -> Result<()>;

    /// Release the resource; no further ticks are delivered
    async fn unload(&self) -> Result<()>;

    /// Subscribe to status ticks
    fn subscribe(&self) -> StatusStream;
}
