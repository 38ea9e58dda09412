use canopy_common::{Bounds, BoxType, CanopyError, FrameId, ItemId, WorkspaceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::WireMessage;
use crate::definitions::BoxDefinition;
use crate::layout::{ImportMode, WorkspaceLayout, WorkspaceLayoutConfig};
use crate::locks::{LockConfig, LockTarget};
use crate::operations::Operation;

fn require(operation: Operation, ok: bool, reason: &str) -> Result<(), CanopyError> {
    if ok {
        Ok(())
    } else {
        Err(CanopyError::validation(operation.as_str(), reason))
    }
}

fn check_locks(
    operation: Operation,
    config: Option<&LockConfig>,
    target: LockTarget,
) -> Result<(), CanopyError> {
    match config {
        Some(config) => config
            .check_target(target)
            .map_err(|reason| CanopyError::validation(operation.as_str(), reason)),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewFrameConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

/// `newFrame` accepts either `true` or an object with placement options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NewFrame {
    Flag(bool),
    Config(NewFrameConfig),
}

impl NewFrame {
    pub fn requested(&self) -> bool {
        !matches!(self, NewFrame::Flag(false))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            NewFrame::Config(config) => config.bounds,
            NewFrame::Flag(_) => None,
        }
    }
}

/// Where a new workspace should land. At most one key may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FrameSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_frame: Option<NewFrame>,
}

impl FrameSelector {
    pub fn by_frame(frame_id: FrameId) -> Self {
        Self {
            frame_id: Some(frame_id),
            ..Self::default()
        }
    }

    pub fn by_item(item_id: ItemId) -> Self {
        Self {
            item_id: Some(item_id),
            ..Self::default()
        }
    }

    pub fn new_frame() -> Self {
        Self {
            new_frame: Some(NewFrame::Flag(true)),
            ..Self::default()
        }
    }

    /// Names of every key present, whatever its value.
    pub fn present_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if self.frame_id.is_some() {
            keys.push("frameId".to_string());
        }
        if self.item_id.is_some() {
            keys.push("itemId".to_string());
        }
        if self.new_frame.is_some() {
            keys.push("newFrame".to_string());
        }
        keys
    }

    pub fn check_exclusive(&self) -> Result<(), CanopyError> {
        let keys = self.present_keys();
        if keys.len() > 1 {
            return Err(CanopyError::OverSpecified(keys));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParentType {
    Workspace,
    Row,
    Column,
    Group,
}

impl ParentType {
    pub fn box_type(&self) -> Option<BoxType> {
        match self {
            ParentType::Workspace => None,
            ParentType::Row => Some(BoxType::Row),
            ParentType::Column => Some(BoxType::Column),
            ParentType::Group => Some(BoxType::Group),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateWorkspaceRequest {
    #[serde(default)]
    pub children: Vec<BoxDefinition>,
    #[serde(default)]
    pub config: WorkspaceLayoutConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_name: Option<String>,
}

impl WireMessage for CreateWorkspaceRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        if let Some(frame) = &self.frame {
            frame.check_exclusive()?;
        }
        check_locks(operation, Some(&self.config.settings.locks), LockTarget::Workspace)?;
        require(
            operation,
            self.config.settings.constraints.is_empty(),
            "workspace config does not take size constraints",
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RestoreOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OpenWorkspaceRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_options: Option<RestoreOptions>,
}

impl WireMessage for OpenWorkspaceRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(operation, !self.name.trim().is_empty(), "`name` must not be empty")?;
        if let Some(frame) = self.restore_options.as_ref().and_then(|o| o.frame.as_ref()) {
            frame.check_exclusive()?;
        }
        Ok(())
    }
}

/// Payload of every operation that addresses a single item by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemRequest {
    pub item_id: ItemId,
}

impl ItemRequest {
    pub fn new(item_id: impl Into<ItemId>) -> Self {
        Self {
            item_id: item_id.into(),
        }
    }
}

impl WireMessage for ItemRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(operation, !self.item_id.as_str().is_empty(), "`itemId` must not be empty")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyRequest {}

impl WireMessage for EmptyRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddWindowRequest {
    pub definition: BoxDefinition,
    pub parent_id: ItemId,
    pub parent_type: ParentType,
}

impl WireMessage for AddWindowRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(
            operation,
            self.definition.box_type.map_or(true, |t| t == BoxType::Window),
            "definition must describe a window",
        )?;
        require(
            operation,
            self.definition.app_name.as_deref().is_some_and(|a| !a.is_empty()),
            "definition is missing `appName`",
        )?;
        require(
            operation,
            self.definition.children.is_empty(),
            "a window definition cannot have children",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddContainerRequest {
    pub definition: BoxDefinition,
    pub parent_id: ItemId,
    pub parent_type: ParentType,
}

impl WireMessage for AddContainerRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        let resolved = self.definition.resolved_type(self.parent_type.box_type());
        require(
            operation,
            resolved.is_container(),
            "definition must describe a row, column or group",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoveWindowToRequest {
    pub item_id: ItemId,
    pub container_id: ItemId,
}

impl WireMessage for MoveWindowToRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResizeItemRequest {
    pub item_id: ItemId,
    /// Absolute pixels, or a signed delta when `relative` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default)]
    pub relative: bool,
}

impl WireMessage for ResizeItemRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(
            operation,
            self.width.is_some() || self.height.is_some(),
            "at least one of `width` or `height` is required",
        )?;
        let negative = [self.width, self.height].iter().flatten().any(|v| *v < 0);
        require(
            operation,
            self.relative || !negative,
            "absolute `width` and `height` must not be negative",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoveFrameRequest {
    pub item_id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(default)]
    pub relative: bool,
}

impl WireMessage for MoveFrameRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(
            operation,
            self.top.is_some() || self.left.is_some(),
            "at least one of `top` or `left` is required",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetItemTitleRequest {
    pub item_id: ItemId,
    pub title: String,
}

impl WireMessage for SetItemTitleRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(operation, !self.title.is_empty(), "`title` must not be empty")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BundleType {
    Row,
    Column,
}

impl BundleType {
    pub fn box_type(&self) -> BoxType {
        match self {
            BundleType::Row => BoxType::Row,
            BundleType::Column => BoxType::Column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BundleWorkspaceRequest {
    pub workspace_id: WorkspaceId,
    #[serde(rename = "type")]
    pub bundle_type: BundleType,
}

impl WireMessage for BundleWorkspaceRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkspaceRequest {
    pub workspace_id: WorkspaceId,
}

impl WorkspaceRequest {
    pub fn new(workspace_id: WorkspaceId) -> Self {
        Self { workspace_id }
    }
}

impl WireMessage for WorkspaceRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LockWorkspaceRequest {
    pub workspace_id: WorkspaceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<LockConfig>,
}

impl WireMessage for LockWorkspaceRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        check_locks(operation, self.config.as_ref(), LockTarget::Workspace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LockContainerRequest {
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub container_type: BoxType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<LockConfig>,
}

impl WireMessage for LockContainerRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        if !self.container_type.is_container() {
            return Err(CanopyError::UnsupportedOperation(format!(
                "{operation} cannot target a {}",
                self.container_type
            )));
        }
        check_locks(
            operation,
            self.config.as_ref(),
            LockTarget::from(self.container_type),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LockWindowRequest {
    pub item_id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<LockConfig>,
}

impl WireMessage for LockWindowRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        check_locks(operation, self.config.as_ref(), LockTarget::Window)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveLayoutRequest {
    pub name: String,
    pub workspace_id: WorkspaceId,
    #[serde(default = "default_true")]
    pub save_context: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl WireMessage for SaveLayoutRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(operation, !self.name.trim().is_empty(), "`name` must not be empty")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteLayoutRequest {
    pub name: String,
}

impl WireMessage for DeleteLayoutRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(operation, !self.name.trim().is_empty(), "`name` must not be empty")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImportLayoutRequest {
    pub layouts: Vec<WorkspaceLayout>,
    #[serde(default)]
    pub mode: ImportMode,
}

impl WireMessage for ImportLayoutRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        for layout in &self.layouts {
            layout
                .validate()
                .map_err(|reason| CanopyError::validation(operation.as_str(), reason))?;
        }
        Ok(())
    }
}

/// Asks whether a native window is currently placed in any workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IsWindowInWorkspaceRequest {
    pub window_id: String,
}

impl WireMessage for IsWindowInWorkspaceRequest {}

/// Sent by a frame once its document is ready to take requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FrameHelloRequest {
    pub window_id: FrameId,
}

impl WireMessage for FrameHelloRequest {
    fn check(&self, operation: Operation) -> Result<(), CanopyError> {
        require(
            operation,
            !self.window_id.as_str().is_empty(),
            "`windowId` must not be empty",
        )
    }
}
