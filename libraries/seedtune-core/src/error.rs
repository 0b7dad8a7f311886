/// Core error types for Seedtune
use thiserror::Error;

/// Result type alias using `SeedtuneError`
pub type Result<T> = std::result::Result<T, SeedtuneError>;

/// Core error type for Seedtune
#[derive(Error, Debug)]
pub enum SeedtuneError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SeedtuneError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
