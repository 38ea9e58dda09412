//! Read-only views of a workspace: resolved constraints, resolved locks and
//! pixel sizes folded into the protocol snapshot types.

use std::collections::HashMap;

use canopy_common::{FrameId, ItemId, Size};
use canopy_protocol::{
    BoxSnapshot, BoxSnapshotConfig, FrameSummary, WorkspaceSnapshot, WorkspaceSummary,
    WorkspaceSummaryConfig,
};

use super::types::Workspace;
use crate::constraints::{resolve_all, Constraints};
use crate::geometry::compute;
use crate::locking::resolved_config;

/// Where a workspace sits when it is described.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub frame_id: &'a FrameId,
    pub position_index: usize,
    pub viewport: Size,
}

struct Resolved {
    constraints: HashMap<ItemId, Constraints>,
    sizes: HashMap<ItemId, Size>,
}

impl Workspace {
    fn resolve(&self, viewport: Size) -> Resolved {
        Resolved {
            constraints: resolve_all(&self.tree),
            sizes: compute(&self.tree, viewport),
        }
    }

    pub fn summary(&self, placement: Placement<'_>) -> WorkspaceSummary {
        let constraints = resolve_all(&self.tree);
        WorkspaceSummary {
            id: self.id.clone(),
            config: self.summary_config(placement, &constraints),
        }
    }

    fn summary_config(
        &self,
        placement: Placement<'_>,
        constraints: &HashMap<ItemId, Constraints>,
    ) -> WorkspaceSummaryConfig {
        let root = self.tree.root();
        let bounds = constraints
            .get(root)
            .copied()
            .unwrap_or_default()
            .clamped();
        WorkspaceSummaryConfig {
            frame_id: placement.frame_id.clone(),
            title: self.title.clone(),
            position_index: placement.position_index,
            layout_name: self.layout_name.clone(),
            is_selected: self.is_selected,
            is_hibernated: self.is_hibernated(),
            last_active: self.last_active,
            window_count: self.window_count(),
            min_width: bounds.min_width,
            max_width: bounds.max_width,
            min_height: bounds.min_height,
            max_height: bounds.max_height,
            locks: resolved_config(&self.tree, root),
        }
    }

    pub fn snapshot(&self, placement: Placement<'_>, frame_summary: FrameSummary) -> WorkspaceSnapshot {
        let resolved = self.resolve(placement.viewport);
        WorkspaceSnapshot {
            id: self.id.clone(),
            config: self.summary_config(placement, &resolved.constraints),
            children: self
                .tree
                .children(self.tree.root())
                .iter()
                .filter_map(|child| self.box_snapshot(child, placement, &resolved))
                .collect(),
            frame_summary,
            context: self.context.clone(),
        }
    }

    /// Snapshot of the subtree rooted at box `id`.
    pub fn box_snapshot_of(&self, id: &ItemId, placement: Placement<'_>) -> Option<BoxSnapshot> {
        let resolved = self.resolve(placement.viewport);
        self.box_snapshot(id, placement, &resolved)
    }

    fn box_snapshot(
        &self,
        id: &ItemId,
        placement: Placement<'_>,
        resolved: &Resolved,
    ) -> Option<BoxSnapshot> {
        let node = self.tree.get(id)?;
        let box_type = node.kind.box_type()?;
        let bounds = resolved
            .constraints
            .get(id)
            .copied()
            .unwrap_or_default()
            .clamped();
        let is_maximized = self.maximized.as_ref() == Some(id);
        let size = if is_maximized {
            placement.viewport
        } else {
            resolved.sizes.get(id).copied().unwrap_or_default()
        };
        let window = node.window.as_ref();

        Some(BoxSnapshot {
            id: id.clone(),
            box_type,
            config: BoxSnapshotConfig {
                frame_id: placement.frame_id.clone(),
                workspace_id: self.id.clone(),
                position_index: self.tree.position_index(id),
                min_width: bounds.min_width,
                max_width: bounds.max_width,
                min_height: bounds.min_height,
                max_height: bounds.max_height,
                width: size.width,
                height: size.height,
                is_maximized,
                locks: resolved_config(&self.tree, id),
                app_name: window.map(|w| w.app_name.clone()),
                window_id: window.and_then(|w| w.window_id.clone()),
                title: window.and_then(|w| w.title.clone()),
                url: window.and_then(|w| w.url.clone()),
                context: window.and_then(|w| w.context.clone()),
                is_loaded: window.map(|w| w.is_loaded()),
                is_focused: window.map(|w| w.is_focused),
            },
            children: node
                .children
                .iter()
                .filter_map(|child| self.box_snapshot(child, placement, resolved))
                .collect(),
        })
    }
}
