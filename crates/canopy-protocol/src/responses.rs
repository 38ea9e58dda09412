use canopy_common::{CanopyError, ItemId};
use serde::{Deserialize, Serialize};

use crate::decode::WireMessage;
use crate::layout::{LayoutSummary, WorkspaceLayout};
use crate::operations::Operation;
use crate::snapshots::{FrameSnapshot, FrameSummary, WorkspaceSnapshot, WorkspaceSummary};

/// Result of operations that return nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Empty {}

impl WireMessage for Empty {}

impl WireMessage for WorkspaceSnapshot {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        if self.config.frame_id != self.frame_summary.id {
            return Err(CanopyError::validation(
                operation.as_str(),
                "snapshot frame id does not match its frame summary",
            ));
        }
        Ok(())
    }
}

impl WireMessage for FrameSnapshot {}

impl WireMessage for FrameSummary {}

impl WireMessage for WorkspaceLayout {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        self.validate()
            .map_err(|reason| CanopyError::validation(operation.as_str(), reason))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummaries {
    pub summaries: Vec<WorkspaceSummary>,
}

impl WireMessage for WorkspaceSummaries {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummaries {
    pub summaries: Vec<FrameSummary>,
}

impl WireMessage for FrameSummaries {}

/// Result of `addWindow` / `addContainer`.
///
/// `constraints_applied` is false when the requested size constraints were
/// dropped because they conflicted with the surrounding tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemResult {
    pub item_id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    pub constraints_applied: bool,
}

impl WireMessage for AddItemResult {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowIdResult {
    pub window_id: String,
}

impl WireMessage for WindowIdResult {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        if self.window_id.is_empty() {
            return Err(CanopyError::validation(
                operation.as_str(),
                "`windowId` must not be empty",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutsResult {
    pub layouts: Vec<WorkspaceLayout>,
}

impl WireMessage for LayoutsResult {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        for layout in &self.layouts {
            layout.check(operation)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummaries {
    pub summaries: Vec<LayoutSummary>,
}

impl WireMessage for LayoutSummaries {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InWorkspaceResult {
    pub in_workspace: bool,
}

impl WireMessage for InWorkspaceResult {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::snapshots::fixtures::workspace;
    use canopy_common::FrameId;
    use serde_json::json;

    #[test]
    fn add_item_result_wire_shape() {
        let result = decode::<AddItemResult>(
            Operation::AddContainer,
            json!({"itemId": "c-1", "constraintsApplied": false}),
        )
        .unwrap();
        assert!(!result.constraints_applied);
        assert!(result.window_id.is_none());
    }

    #[test]
    fn snapshot_with_mismatched_frame_is_rejected() {
        let mut snapshot = workspace(vec![]);
        snapshot.frame_summary.id = FrameId::from("other");
        let value = serde_json::to_value(&snapshot).unwrap();
        let err = decode::<WorkspaceSnapshot>(Operation::GetWorkspaceSnapshot, value).unwrap_err();
        assert!(matches!(err, CanopyError::Validation { ref operation, .. } if operation == "getWorkspaceSnapshot"));
    }

    #[test]
    fn empty_window_id_is_rejected() {
        let err = decode::<WindowIdResult>(Operation::EjectWindow, json!({"windowId": ""}))
            .unwrap_err();
        assert!(err.to_string().contains("windowId"));
    }

    #[test]
    fn missing_summaries_field_is_rejected() {
        assert!(decode::<FrameSummaries>(Operation::GetAllFramesSummaries, json!({})).is_err());
    }
}
