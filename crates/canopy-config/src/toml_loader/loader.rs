//! Reading `config.toml` from disk, or falling back to a freshly written default.

use std::io::ErrorKind;
use std::path::Path;

use canopy_common::ConfigError;

use super::paths::{create_default_config, default_config_path};
use crate::schema::CanopyConfig;
use crate::validation;

/// Parses TOML text into a config. Sections and keys left out take their
/// defaults.
pub fn parse(content: &str) -> Result<CanopyConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(format!("invalid config TOML: {e}")))
}

/// Loads the config at `path`.
///
/// Out-of-range values are logged and kept; callers that need a valid config
/// run [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<CanopyConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("cannot read {}: {e}", path.display())),
    })?;
    let config = parse(&content)?;

    if let Err(e) = validation::validate(&config) {
        tracing::warn!(path = %path.display(), error = %e, "config has out-of-range values");
    }
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Loads `config.toml` from the user config directory, writing the
/// documented template there first when no file exists yet.
pub fn load_default() -> Result<CanopyConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(CanopyConfig::default())
        }
        loaded => loaded,
    }
}
