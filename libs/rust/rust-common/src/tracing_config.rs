//! Tracing subscriber setup for binaries and test harnesses.
//!
//! Libraries only emit events; installing the subscriber is left to the
//! process that links them.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Create config with custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// Installs the global subscriber if none is set yet. Returns `true` when
/// this call installed it and `false` when a subscriber already existed,
/// so repeated calls (e.g. from several tests) are harmless.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_output);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::default()
            .with_log_level("debug")
            .with_json_output();

        assert_eq!(config.log_level, "debug");
        assert!(config.json_output);
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = TracingConfig::default().with_log_level("debug");
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
