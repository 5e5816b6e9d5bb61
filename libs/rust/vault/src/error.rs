//! Vault error types using thiserror 2.0.
//!
//! Callers distinguish a missing key ([`VaultError::NotFound`]) from a
//! server-reported failure ([`VaultError::Remote`]) and from raw transport
//! errors, which some operations pass through untouched.

use reqwest::StatusCode;
use rust_common::PlatformError;
use thiserror::Error;

/// Vault-specific errors.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Response body was not a JSON object, or an error body had no `errors`
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Secret not found
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Server reported errors, joined with ", "
    #[error("Vault error: {0}")]
    Remote(String),

    /// Network failure or an HTTP error status passed through unmodified
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Platform error
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for Vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Create a secret not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Create a remote error from the server's error strings.
    #[must_use]
    pub fn remote<S: AsRef<str>>(errors: &[S]) -> Self {
        let joined = errors
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ");
        Self::Remote(joined)
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Check if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status carried by a pass-through transport error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}
