//! Centralized error types for the shared plumbing.

use thiserror::Error;

/// Common error type for platform operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlatformError {
    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
