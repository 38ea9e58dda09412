//! Canopy configuration system.
//!
//! TOML-based configuration for the workspace platform: frame handshake
//! and window-load timeouts, hibernation policy thresholds, the layout
//! import directory and logging. Every section has defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use canopy_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("hello timeout: {}ms", config.frames.hello_timeout_ms);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    CanopyConfig, FramesConfig, HibernationConfig, IdleWorkspacesConfig, LayoutsConfig,
    LogLevel, LoggingConfig, MaximumActiveWorkspacesConfig, CONFIG_SCHEMA_VERSION,
};

use canopy_common::ConfigError;

/// Load config from the platform default path, creating it if missing,
/// and validate the result.
pub fn load_config() -> Result<CanopyConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CanopyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
