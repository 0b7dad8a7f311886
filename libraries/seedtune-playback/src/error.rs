//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track has no usable preview URL
    #[error("Track has no preview: {0}")]
    MissingPreview(String),

    /// Queue play command issued with no tracks
    #[error("Queue is empty")]
    QueueEmpty,

    /// Audio engine failed to load or control a sound
    #[error("Audio engine error: {0}")]
    Engine(String),

    /// The session task has shut down
    #[error("Playback session closed")]
    SessionClosed,
}

impl PlaybackError {
    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
