//! Locking calls.

use canopy_common::{CanopyError, ItemId};
use canopy_protocol::LockConfig;

use super::inheritance::resolved_config;
use crate::tree::BoxTree;

/// How a lock call was made.
pub enum LockRequest {
    /// No argument: every recognized flag locked.
    Default,
    /// An object: omitted flags unlocked, directional flags following an
    /// explicit `allowDrop`.
    Explicit(LockConfig),
    /// A function of the current resolved config; its result is filled like
    /// an explicit object.
    Builder(Box<dyn FnOnce(&LockConfig) -> LockConfig + Send>),
}

impl LockRequest {
    /// Wire form: an absent config means the no-argument call.
    pub fn from_wire(config: Option<LockConfig>) -> Self {
        match config {
            Some(config) => LockRequest::Explicit(config),
            None => LockRequest::Default,
        }
    }
}

impl std::fmt::Debug for LockRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockRequest::Default => f.write_str("Default"),
            LockRequest::Explicit(config) => f.debug_tuple("Explicit").field(config).finish(),
            LockRequest::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

/// Replaces the explicit lock set of `id`. Descendants without their own
/// explicit value for a flag follow it through inheritance; those with one
/// are left alone.
pub fn lock(tree: &mut BoxTree, id: &ItemId, request: LockRequest) -> Result<(), CanopyError> {
    let target = tree.node(id)?.kind.lock_target();
    let explicit = match request {
        LockRequest::Default => LockConfig::all_locked(target),
        LockRequest::Explicit(config) => filled(config, target)?,
        LockRequest::Builder(build) => {
            let current = resolved_config(tree, id);
            filled(build(&current), target)?
        }
    };
    tracing::debug!(item_id = %id, target = %target, "applying lock");
    tree.node_mut(id)?.locks = explicit;
    Ok(())
}

fn filled(
    config: LockConfig,
    target: canopy_protocol::LockTarget,
) -> Result<LockConfig, CanopyError> {
    config
        .check_target(target)
        .map_err(|reason| CanopyError::validation("lock", reason))?;
    Ok(config.filled_for(target))
}
