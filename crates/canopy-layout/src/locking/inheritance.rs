//! Lazy resolution of lock flags through the ancestor chain.

use canopy_common::ItemId;
use canopy_protocol::{LockConfig, LockFlag};

use crate::tree::{BoxTree, NodeKind};

/// The flag on a parent of kind `parent` that a child's `flag` inherits from.
///
/// Workspaces expose plural or renamed flags that fan out to their boxes;
/// every other container passes flags through under the same name.
pub fn inherited_from(parent: NodeKind, flag: LockFlag) -> LockFlag {
    if parent != NodeKind::Workspace {
        return flag;
    }
    match flag {
        LockFlag::AllowDropHeader => LockFlag::AllowDrop,
        LockFlag::AllowReorder => LockFlag::AllowWindowReorder,
        LockFlag::ShowEjectButton => LockFlag::ShowEjectButtons,
        LockFlag::ShowAddWindowButton => LockFlag::ShowAddWindowButtons,
        LockFlag::ShowCloseButton => LockFlag::ShowWindowCloseButtons,
        other => other,
    }
}

/// Effective value of `flag` on `id`: its own explicit value, then its own
/// `allowDrop` for directional flags, then the mapped ancestor flag.
/// The flag's default when nothing along the chain sets it.
pub fn resolve(tree: &BoxTree, id: &ItemId, flag: LockFlag) -> bool {
    let unset = flag.default_value();
    let mut current = id.clone();
    let mut flag = flag;
    loop {
        let Some(node) = tree.get(&current) else {
            return unset;
        };
        if let Some(value) = node.locks.get(flag) {
            return value;
        }
        if !flag.is_inherited() {
            return unset;
        }
        if flag.is_directional() {
            if let Some(value) = node.locks.get(LockFlag::AllowDrop) {
                return value;
            }
        }
        let Some(parent) = node.parent.as_ref().and_then(|p| tree.get(p)) else {
            return unset;
        };
        flag = inherited_from(parent.kind, flag);
        current = parent.id.clone();
    }
}

/// Every flag recognized by `id`'s type, resolved.
pub fn resolved_config(tree: &BoxTree, id: &ItemId) -> LockConfig {
    let Some(node) = tree.get(id) else {
        return LockConfig::default();
    };
    node.kind
        .lock_target()
        .flags()
        .iter()
        .map(|flag| (*flag, resolve(tree, id, *flag)))
        .collect()
}
