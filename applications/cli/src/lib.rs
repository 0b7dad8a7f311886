//! Seedtune CLI Library
//!
//! Configuration and wiring for the `seedtune` binary, exposed for testing.

pub mod config;
pub mod error;

pub use self::config::{AppConfig, PlaybackSettings, UserSettings};
pub use self::error::{AppError, Result};
