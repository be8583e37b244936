//! Configuration for the codec
//!
//! Settings are stored as TOML and map onto [`CodecConfig`] via serde. A
//! missing file is created with the defaults on first load.
//!
//! # Example
//!
//! ```ignore
//! use polycodec_core::{logging, Codec, CodecConfig};
//!
//! let config = CodecConfig::load()?;
//! logging::init(&config);
//! let codec = Codec::from_config(&config);
//! ```
//!
//! ```toml
//! version = 1
//! debug = false
//! autoseal = true
//! log_filter = "polycodec_core=debug"
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use loader::{config_path, resolve_config_path, CONFIG_ENV, CONFIG_FILE_NAME};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Codec configuration.
///
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Start codecs in the autoseal-pending state
    pub autoseal: bool,

    /// `tracing` filter directive; `RUST_LOG` takes precedence
    pub log_filter: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            autoseal: false,
            log_filter: "info".to_string(),
        }
    }
}

impl CodecConfig {
    /// Load config from the resolved config path, creating default if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load config from `path`, creating default if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded codec config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default codec config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to the resolved config path.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&config_path()?)
    }

    /// Save config to `path`.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved codec config to {:?}", path);
        Ok(())
    }

    /// Reload config from `path`.
    pub fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded codec config from {:?}", path);
        Ok(())
    }

    /// Effective log filter: `debug` raises the default level
    pub fn effective_log_filter(&self) -> &str {
        if self.debug && self.log_filter == Self::default().log_filter {
            "debug"
        } else {
            &self.log_filter
        }
    }
}
