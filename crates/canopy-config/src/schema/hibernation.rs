//! Hibernation policy: idle timers and the maximum number of active workspaces.

use serde::{Deserialize, Serialize};

/// Both policies are off unless their section is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HibernationConfig {
    pub idle_workspaces: Option<IdleWorkspacesConfig>,
    pub maximum_active_workspaces: Option<MaximumActiveWorkspacesConfig>,
}

impl HibernationConfig {
    pub fn is_enabled(&self) -> bool {
        self.idle_workspaces.is_some() || self.maximum_active_workspaces.is_some()
    }
}

/// Hibernate a workspace that has seen no activity for this long.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleWorkspacesConfig {
    pub idle_ms_threshold: u64,
}

/// Keep at most `threshold` non-hibernated, non-empty workspaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaximumActiveWorkspacesConfig {
    pub threshold: usize,
}
