//! Application configuration
//!
//! Read from an optional TOML file, then overridden by `SEEDTUNE_*`
//! environment variables. Nested keys use a double underscore, e.g.
//! `SEEDTUNE_BACKEND__BASE_URL` or `SEEDTUNE_USER__ACCESS_TOKEN`.

use crate::error::{AppError, Result};
use seedtune_client::{ClientConfig, DEFAULT_STREAMING_URL};
use seedtune_playback::{PlaybackConfig, SilentEngineConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "seedtune.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub user: UserSettings,

    #[serde(default = "default_backend")]
    pub backend: ClientConfig,

    #[serde(default = "default_streaming")]
    pub streaming: ClientConfig,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

/// Signed-in user and their tokens
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSettings {
    /// Streaming-platform user id (owner of backend playlists)
    #[serde(default)]
    pub spotify_id: String,

    #[serde(default)]
    pub access_token: String,

    /// When set, expired access tokens are refreshed through the backend
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_clamp_seek")]
    pub clamp_seek: bool,

    /// Silent engine tick interval
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Silent engine clip length (previews are 30 seconds)
    #[serde(default = "default_clip_length_ms")]
    pub clip_length_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            clamp_seek: default_clamp_seek(),
            tick_interval_ms: default_tick_interval_ms(),
            clip_length_ms: default_clip_length_ms(),
        }
    }
}

impl PlaybackSettings {
    pub fn session_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            clamp_seek: self.clamp_seek,
            ..PlaybackConfig::default()
        }
    }

    pub fn engine_config(&self) -> SilentEngineConfig {
        SilentEngineConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            clip_length_ms: self.clip_length_ms,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; without one, `seedtune.toml` is used
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with SEEDTUNE_)
        settings = settings.add_source(
            config::Environment::with_prefix("SEEDTUNE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.backend
            .normalized_url()
            .map_err(|e| AppError::Config(format!("backend: {e}")))?;
        self.streaming
            .normalized_url()
            .map_err(|e| AppError::Config(format!("streaming: {e}")))?;

        if self.playback.tick_interval_ms == 0 {
            return Err(AppError::Config(
                "playback tick interval must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Fail unless the user is signed in
    pub fn require_user(&self) -> Result<&UserSettings> {
        if self.user.spotify_id.is_empty() || self.user.access_token.is_empty() {
            return Err(AppError::Config(
                "not signed in (set SEEDTUNE_USER__SPOTIFY_ID and SEEDTUNE_USER__ACCESS_TOKEN)"
                    .to_string(),
            ));
        }
        Ok(&self.user)
    }
}

// Default values
fn default_backend() -> ClientConfig {
    ClientConfig::new("http://localhost:8080")
}

fn default_streaming() -> ClientConfig {
    ClientConfig::new(DEFAULT_STREAMING_URL)
}

fn default_clamp_seek() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    250
}

fn default_clip_length_ms() -> u64 {
    30_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
            [user]
            spotify_id = "user-1"
            access_token = "token"

            [backend]
            base_url = "https://api.example.com/"
            timeout_ms = 2000

            [playback]
            clip_length_ms = 10000
            "#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.user.spotify_id, "user-1");
        assert_eq!(config.backend.normalized_url().unwrap(), "https://api.example.com");
        assert_eq!(config.backend.timeout_ms, 2000);
        assert_eq!(config.streaming.base_url, DEFAULT_STREAMING_URL);
        assert_eq!(config.playback.clip_length_ms, 10_000);
        assert_eq!(config.playback.tick_interval_ms, 250);
        assert!(config.require_user().is_ok());
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/seedtune.toml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_backend_url_rejected() {
        let file = write_config(
            r#"
            [backend]
            base_url = "ftp://example.com"
            "#,
        );

        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("backend")));
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let file = write_config(
            r#"
            [playback]
            tick_interval_ms = 0
            "#,
        );

        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_require_user() {
        let file = write_config("");
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert!(config.require_user().is_err());
    }

    #[test]
    fn test_playback_settings_map_to_engine() {
        let settings = PlaybackSettings {
            clamp_seek: false,
            tick_interval_ms: 100,
            clip_length_ms: 5_000,
        };

        assert!(!settings.session_config().clamp_seek);
        let engine = settings.engine_config();
        assert_eq!(engine.tick_interval, Duration::from_millis(100));
        assert_eq!(engine.clip_length_ms, 5_000);
    }
}
