//! Wire protocol between the platform and its frames.
//!
//! Every payload that crosses a frame boundary is a JSON value; this crate
//! defines the typed shape of each one and the decoders that turn raw
//! values into those shapes, rejecting anything malformed with a
//! `CanopyError::Validation` that names the operation and the violation.
//!
//! - [`operations`]: the closed set of operation names
//! - [`requests`] / [`responses`]: per-operation payloads
//! - [`definitions`]: box definitions accepted by add/create operations
//! - [`snapshots`]: serialized trees and summaries returned to clients
//! - [`layout`]: the persisted workspace layout document
//! - [`decode`]: the decoder registry

pub mod decode;
pub mod definitions;
pub mod layout;
pub mod locks;
pub mod operations;
pub mod requests;
pub mod responses;
pub mod snapshots;

pub use decode::{decode, Request, Response, WireMessage};
pub use definitions::{BoxDefinition, ConstraintsConfig, DefinitionConfig};
pub use layout::{
    ImportMode, LayoutComponent, LayoutKind, LayoutNode, LayoutNodeConfig, LayoutSummary,
    WorkspaceLayout, WorkspaceLayoutConfig, WorkspaceLayoutState,
};
pub use locks::{LockConfig, LockFlag, LockTarget};
pub use operations::Operation;
pub use responses::AddItemResult;
pub use snapshots::{
    BoxSnapshot, BoxSnapshotConfig, FrameSnapshot, FrameSummary, WorkspaceSnapshot,
    WorkspaceSummary, WorkspaceSummaryConfig,
};

#[cfg(test)]
mod tests {
    use crate::{
        AddItemResult, LayoutNodeConfig, LockFlag, WorkspaceLayoutConfig, WorkspaceLayoutState,
    };
    use serde_json::json;

    #[test]
    fn layout_types_are_reachable_from_the_crate_root() {
        let state: WorkspaceLayoutState = serde_json::from_value(json!({
            "children": [{
                "type": "row",
                "config": {"isPinned": true},
                "children": [{"type": "window", "config": {"appName": "chart"}}]
            }],
            "config": {"title": "Desk", "allowDrop": false},
            "context": {}
        }))
        .unwrap();

        let config: &WorkspaceLayoutConfig = &state.config;
        assert_eq!(config.title.as_deref(), Some("Desk"));
        assert_eq!(config.settings.locks.get(LockFlag::AllowDrop), Some(false));

        let row = &state.children[0];
        assert_eq!(row.config.settings.locks.get(LockFlag::IsPinned), Some(true));
        let window: &LayoutNodeConfig = &row.children[0].config;
        assert_eq!(window.app_name.as_deref(), Some("chart"));
    }

    #[test]
    fn add_item_result_omits_missing_window_id() {
        let result: AddItemResult = serde_json::from_value(json!({
            "itemId": "b-1", "constraintsApplied": true
        }))
        .unwrap();
        assert!(result.window_id.is_none());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"itemId": "b-1", "constraintsApplied": true})
        );
    }
}
