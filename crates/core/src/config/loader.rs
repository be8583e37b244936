//! Config path resolution
//!
//! The config file is taken from the `POLYCODEC_CONFIG` environment variable
//! when set, and from `polycodec.toml` in the working directory otherwise.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::ConfigResult;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "POLYCODEC_CONFIG";

/// Default config file name, relative to the working directory
pub const CONFIG_FILE_NAME: &str = "polycodec.toml";

/// Returns the codec config path.
pub fn config_path() -> ConfigResult<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(resolve_config_path(std::env::var_os(CONFIG_ENV), &cwd))
}

/// Resolve the config path from an optional override and a base directory
///
/// A relative override is taken relative to `base`; an empty one is ignored.
pub fn resolve_config_path(override_path: Option<OsString>, base: &Path) -> PathBuf {
    match override_path {
        Some(path) if !path.is_empty() => base.join(path),
        _ => base.join(CONFIG_FILE_NAME),
    }
}
