use canopy_common::{BoxType, FrameId, ItemId, WorkspaceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::locks::LockConfig;

/// Resolved, read-only view of one box. Constraint and lock values are the
/// effective ones after aggregation and inheritance, not the explicit ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSnapshotConfig {
    pub frame_id: FrameId,
    pub workspace_id: WorkspaceId,
    pub position_index: usize,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub is_maximized: bool,
    #[serde(default)]
    pub locks: LockConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_loaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_focused: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSnapshot {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub box_type: BoxType,
    pub config: BoxSnapshotConfig,
    #[serde(default)]
    pub children: Vec<BoxSnapshot>,
}

impl BoxSnapshot {
    /// Depth-first search for `id` in this subtree, including the root.
    pub fn find(&self, id: &ItemId) -> Option<&BoxSnapshot> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Every box below this one, depth first, excluding itself.
    pub fn descendants(&self) -> Vec<&BoxSnapshot> {
        let mut out = Vec::new();
        let mut stack: Vec<&BoxSnapshot> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummaryConfig {
    pub frame_id: FrameId,
    pub title: String,
    pub position_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_name: Option<String>,
    pub is_selected: bool,
    pub is_hibernated: bool,
    pub last_active: i64,
    pub window_count: usize,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    #[serde(default)]
    pub locks: LockConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub id: WorkspaceId,
    pub config: WorkspaceSummaryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub id: WorkspaceId,
    pub config: WorkspaceSummaryConfig,
    #[serde(default)]
    pub children: Vec<BoxSnapshot>,
    pub frame_summary: FrameSummary,
    #[serde(default)]
    pub context: Value,
}

impl WorkspaceSnapshot {
    pub fn summary(&self) -> WorkspaceSummary {
        WorkspaceSummary {
            id: self.id.clone(),
            config: self.config.clone(),
        }
    }

    pub fn find(&self, id: &ItemId) -> Option<&BoxSnapshot> {
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Every window in the workspace, in tree order.
    pub fn windows(&self) -> Vec<&BoxSnapshot> {
        self.children
            .iter()
            .flat_map(|child| std::iter::once(child).chain(child.descendants()))
            .filter(|node| node.box_type == BoxType::Window)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    pub id: FrameId,
    #[serde(default)]
    pub workspace_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_workspace_id: Option<WorkspaceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub id: FrameId,
    #[serde(default)]
    pub workspaces: Vec<WorkspaceSnapshot>,
}
