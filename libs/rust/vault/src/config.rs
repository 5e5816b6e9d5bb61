//! Vault client configuration.

use crate::error::{VaultError, VaultResult};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Address used by `from_env` when `VAULT_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "http://127.0.0.1:8200";

/// Vault client configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault server address (absolute URL)
    pub addr: String,
    /// Access token sent on every request
    pub token: SecretString,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl VaultConfig {
    /// Create a new configuration with the default 2 second timeout.
    #[must_use]
    pub fn new(token: impl Into<String>, addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            token: SecretString::from(token.into()),
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(2),
            user_agent: concat!("vault-kv-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Load configuration from `VAULT_ADDR` and `VAULT_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfig`] if `VAULT_TOKEN` is unset.
    pub fn from_env() -> VaultResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfig`] if `VAULT_TOKEN` is missing.
    pub fn from_lookup<F>(lookup: F) -> VaultResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("VAULT_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| VaultError::invalid_config("VAULT_TOKEN is not set"))?;
        let addr = lookup("VAULT_ADDR")
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());

        Ok(Self::new(token, addr))
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check the address is an absolute http(s) URL and the token is set.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> VaultResult<()> {
        let url = Url::parse(&self.addr)
            .map_err(|e| VaultError::invalid_config(format!("addr {:?}: {e}", self.addr)))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(VaultError::invalid_config(format!(
                "addr {:?}: unsupported scheme {}",
                self.addr,
                url.scheme()
            )));
        }

        if self.token.expose_secret().is_empty() {
            return Err(VaultError::invalid_config("token is empty"));
        }

        Ok(())
    }

    /// Base URL without a trailing slash, ready for `/v1/...` paths.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.addr.trim_end_matches('/')
    }
}
