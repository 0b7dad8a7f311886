//! Error types for the Seedtune HTTP clients.

use seedtune_core::SeedtuneError;
use thiserror::Error;

/// Errors that can occur when talking to the backend or the streaming platform.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No usable access token, or the server rejected it after a refresh
    #[error("Authentication required")]
    AuthRequired,

    /// Token refresh failed; the user has to log in again
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Domain validation error
    #[error(transparent)]
    Core(#[from] SeedtuneError),
}

impl ClientError {
    /// Whether the caller should send the user back to login
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::TokenRefreshFailed(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
