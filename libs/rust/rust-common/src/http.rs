//! Centralized HTTP client configuration and building.
//!
//! This module provides a standardized way to create HTTP clients with
//! consistent timeouts and default headers across the client crates.

use crate::error::PlatformError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// HTTP client configuration.
///
/// Headers added through [`HttpConfig::with_default_header`] are sent on
/// every request made by the built client unless the request overrides them.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers attached to every request
    pub default_headers: HeaderMap,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: HeaderMap::new(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with custom timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a new HTTP config with custom connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Create a new HTTP config with custom user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header sent on every request.
    ///
    /// Sensitive values are masked in `Debug` output of the header map.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidInput`] if the name or value is not a
    /// legal HTTP header.
    pub fn with_default_header(
        mut self,
        name: &str,
        value: &str,
        sensitive: bool,
    ) -> Result<Self, PlatformError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| PlatformError::invalid_input(format!("header name {name:?}: {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| PlatformError::invalid_input(format!("header {name}: {e}")))?;
        value.set_sensitive(sensitive);
        self.default_headers.insert(name, value);
        Ok(self)
    }
}

/// Build a configured HTTP client.
///
/// Creates a reqwest client with rustls TLS, the configured timeouts and
/// the default header set. No connection is opened here.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS initialization fails).
///
/// # Examples
///
/// ```
/// use rust_common::{HttpConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = HttpConfig::default()
///     .with_timeout(Duration::from_secs(2))
///     .with_default_header("accept", "application/json", false)
///     .unwrap();
/// let client = build_http_client(&config).unwrap();
/// # drop(client);
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, PlatformError> {
    debug!(
        timeout_ms = config.timeout.as_millis(),
        headers = config.default_headers.len(),
        "Building HTTP client"
    );

    let client = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .default_headers(config.default_headers.clone())
        .use_rustls_tls()
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::default()
            .with_timeout(Duration::from_secs(2))
            .with_user_agent("test-agent");

        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_default_header_added() {
        let config = HttpConfig::default()
            .with_default_header("Accept", "application/json", false)
            .unwrap();

        assert_eq!(
            config.default_headers.get("accept").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_sensitive_header_masked_in_debug() {
        let config = HttpConfig::default()
            .with_default_header("X-Vault-Token", "s.very-secret", true)
            .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("s.very-secret"));
        assert!(config.default_headers.get("x-vault-token").unwrap().is_sensitive());
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let result = HttpConfig::default().with_default_header("X-Vault-Token", "bad\nvalue", true);
        assert!(matches!(result, Err(PlatformError::InvalidInput(_))));
    }

    #[test]
    fn test_build_client() {
        let config = HttpConfig::default();
        let result = build_http_client(&config);
        assert!(result.is_ok());
    }
}
