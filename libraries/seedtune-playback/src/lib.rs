//! Seedtune Playback - preview session management
//!
//! Plays 30-second track previews one at a time. This crate provides:
//! - A single active sound, released before the next one loads
//! - Sequential queue playback with skip forward/back
//! - Auto-advance when a preview finishes, stopping after the last track
//! - Pause/resume, seek, and a full-screen presentation flag
//! - An observable snapshot stream plus transition events
//!
//! # Architecture
//!
//! Audio output is platform code behind the [`AudioEngine`] and [`Sound`]
//! traits. [`PlaybackManager`] holds all session state; [`PlaybackSession`]
//! runs it inside one tokio task and hands out cloneable
//! [`PlaybackHandle`]s. Every load bumps a generation counter, and status
//! ticks from an older generation are ignored.
//!
//! # Example
//!
//! ```rust
//! use seedtune_core::Track;
//! use seedtune_playback::{PlaybackConfig, PlaybackSession, PlaybackState, SilentEngine};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> seedtune_playback::Result<()> {
//! let session = PlaybackSession::spawn(Arc::new(SilentEngine::default()), PlaybackConfig::default());
//!
//! let track = Track::new("t1", "Preview", 30_000).with_preview_url("https://p.scdn.co/mp3-preview/t1");
//! session.play_track(track).await?;
//! assert_eq!(session.snapshot().state, PlaybackState::Playing);
//!
//! session.toggle_play_pause().await?;
//! assert_eq!(session.snapshot().state, PlaybackState::Paused);
//!
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod events;
pub mod manager;
pub mod queue;
pub mod session;
pub mod silent;
pub mod types;

pub use engine::{AudioEngine, EngineStatus, Sound, StatusStream};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use manager::{PlaybackManager, StatusFeed, StatusTick};
pub use queue::PlaybackQueue;
pub use session::{PlaybackCommand, PlaybackHandle, PlaybackSession};
pub use silent::{SilentEngine, SilentEngineConfig};
pub use types::{PlaybackConfig, PlaybackState, SessionSnapshot};
