//! Layout import directory and logging settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where saved layout documents are imported from at start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutsConfig {
    pub directory: Option<PathBuf>,
}

impl LayoutsConfig {
    /// The import directory with a leading `~` expanded to the home directory.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        let dir = self.directory.as_ref()?;
        match dir.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(dir.clone()),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive for the `canopy` crates at this level.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "canopy=trace",
            LogLevel::Debug => "canopy=debug",
            LogLevel::Info => "canopy=info",
            LogLevel::Warn => "canopy=warn",
            LogLevel::Error => "canopy=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
