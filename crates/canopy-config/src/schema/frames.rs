//! Frame lifecycle timing and default geometry.

use serde::{Deserialize, Serialize};

/// Frame coordination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramesConfig {
    /// How long a newly opened frame may take to say hello (valid range: 1000-120000).
    pub hello_timeout_ms: u64,
    /// How long to wait for a window to finish loading (valid range: 500-60000).
    pub window_load_timeout_ms: u64,
    /// Upper bound for any call into a frame (valid range: 1000-120000).
    pub request_timeout_ms: u64,
    /// Width of newly opened frames in pixels (valid range: 200-16384).
    pub default_width: u32,
    /// Height of newly opened frames in pixels (valid range: 200-16384).
    pub default_height: u32,
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            hello_timeout_ms: 15_000,
            window_load_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            default_width: 1280,
            default_height: 800,
        }
    }
}
