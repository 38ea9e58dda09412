//! Configuration schema types for Canopy.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod frames;
mod hibernation;
mod system;

pub use frames::*;
pub use hibernation::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Canopy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    pub frames: FramesConfig,
    pub hibernation: HibernationConfig,
    pub layouts: LayoutsConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
