//! Logging setup
//!
//! The codec only emits `tracing` events; installing a subscriber is left to
//! the application. [`init`] is a convenience for binaries and tests.

use tracing_subscriber::EnvFilter;

use crate::config::CodecConfig;

/// Build the event filter for `config`
///
/// `RUST_LOG` wins when set; otherwise the configured filter is used, and
/// an invalid directive falls back to `info`.
pub fn filter_for(config: &CodecConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.effective_log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a fmt subscriber for `config`
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(config: &CodecConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = CodecConfig::default();
        init(&config);
        assert!(!init(&config));
        tracing::debug!("logging initialized twice");
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        let config = CodecConfig {
            log_filter: "[[not a filter".to_string(),
            ..Default::default()
        };
        // Must not panic
        let _ = filter_for(&config);
    }
}
