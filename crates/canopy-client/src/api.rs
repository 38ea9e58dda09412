//! Entry point for consumers of the platform.

use std::sync::Arc;

use canopy_common::{
    CanopyError, EventAction, EventType, FrameId, ItemId, ItemKind, Result, WorkspaceId,
};
use canopy_platform::PlatformHandle;
use canopy_protocol::requests::{
    CreateWorkspaceRequest, DeleteLayoutRequest, EmptyRequest, ImportLayoutRequest,
    IsWindowInWorkspaceRequest, OpenWorkspaceRequest, RestoreOptions, SaveLayoutRequest,
};
use canopy_protocol::responses::{
    Empty, FrameSummaries, InWorkspaceResult, LayoutSummaries, LayoutsResult, WorkspaceSummaries,
};
use canopy_protocol::{
    ImportMode, LayoutSummary, Operation, WorkspaceLayout, WorkspaceSnapshot, WorkspaceSummary,
};
use serde_json::Value;

use crate::arena::WorkspaceTree;
use crate::boxes::{BoxItem, BoxRef};
use crate::bridge::Bridge;
use crate::events::{EventFilter, Subscription};
use crate::frame::Frame;
use crate::workspace::Workspace;

#[derive(Clone)]
pub struct WorkspacesApi {
    bridge: Bridge,
}

impl WorkspacesApi {
    pub fn new(handle: PlatformHandle) -> Self {
        Self {
            bridge: Bridge::new(handle),
        }
    }

    fn workspace(&self, snapshot: WorkspaceSnapshot) -> Workspace {
        Workspace::new(
            self.bridge.clone(),
            Arc::new(WorkspaceTree::from_snapshot(snapshot)),
        )
    }

    pub async fn create_workspace(&self, request: CreateWorkspaceRequest) -> Result<Workspace> {
        let snapshot = self.bridge.send(Operation::CreateWorkspace, &request).await?;
        Ok(self.workspace(snapshot))
    }

    /// Opens a new workspace from the saved layout `name`.
    pub async fn restore_workspace(
        &self,
        name: impl Into<String>,
        restore_options: Option<RestoreOptions>,
    ) -> Result<Workspace> {
        let request = OpenWorkspaceRequest {
            name: name.into(),
            restore_options,
        };
        let snapshot = self.bridge.send(Operation::OpenWorkspace, &request).await?;
        Ok(self.workspace(snapshot))
    }

    pub async fn get_workspace(&self, id: &WorkspaceId) -> Result<Workspace> {
        let tree = self.bridge.workspace_tree(id).await?;
        Ok(Workspace::new(self.bridge.clone(), tree))
    }

    /// The box `id`, wherever it lives.
    pub async fn get_box(&self, id: &ItemId) -> Result<BoxItem> {
        let tree = self.bridge.tree_of(id).await?;
        let index = tree
            .lookup(id)
            .ok_or_else(|| CanopyError::not_found(ItemKind::Item, id.as_str()))?;
        Ok(BoxItem::from(BoxRef::new(self.bridge.clone(), tree, index)))
    }

    pub async fn workspace_summaries(&self) -> Result<Vec<WorkspaceSummary>> {
        let result: WorkspaceSummaries = self
            .bridge
            .send(Operation::GetAllWorkspacesSummaries, &EmptyRequest::default())
            .await?;
        Ok(result.summaries)
    }

    pub async fn frames(&self) -> Result<Vec<Frame>> {
        let result: FrameSummaries = self
            .bridge
            .send(Operation::GetAllFramesSummaries, &EmptyRequest::default())
            .await?;
        Ok(result
            .summaries
            .into_iter()
            .map(|summary| Frame::new(self.bridge.clone(), summary))
            .collect())
    }

    pub async fn get_frame(&self, id: &FrameId) -> Result<Frame> {
        Frame::fetch(&self.bridge, id).await
    }

    /// Whether the native window `window_id` is placed in any workspace.
    pub async fn is_window_in_workspace(&self, window_id: impl Into<String>) -> Result<bool> {
        let request = IsWindowInWorkspaceRequest {
            window_id: window_id.into(),
        };
        let result: InWorkspaceResult = self
            .bridge
            .send(Operation::IsWindowInWorkspace, &request)
            .await?;
        Ok(result.in_workspace)
    }

    pub fn layouts(&self) -> Layouts {
        Layouts {
            bridge: self.bridge.clone(),
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        Subscription::new(self.bridge.events(), filter)
    }

    pub fn on_window_added(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Window, EventAction::Added))
    }

    pub fn on_window_removed(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Window, EventAction::Removed))
    }

    pub fn on_workspace_opened(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Workspace, EventAction::Opened))
    }

    pub fn on_workspace_closed(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Workspace, EventAction::Closed))
    }

    pub fn on_workspace_selected(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Workspace, EventAction::Selected))
    }

    pub fn on_workspace_hibernated(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Workspace, EventAction::Hibernated))
    }

    pub fn on_workspace_resumed(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Workspace, EventAction::Resumed))
    }

    pub fn on_frame_opened(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Frame, EventAction::Opened))
    }

    pub fn on_frame_closed(&self) -> Subscription {
        self.subscribe(EventFilter::new(EventType::Frame, EventAction::Closed))
    }
}

/// Saved layout documents.
#[derive(Clone)]
pub struct Layouts {
    bridge: Bridge,
}

impl Layouts {
    pub async fn save(
        &self,
        name: impl Into<String>,
        workspace_id: &WorkspaceId,
        save_context: bool,
        metadata: Option<Value>,
    ) -> Result<WorkspaceLayout> {
        let request = SaveLayoutRequest {
            name: name.into(),
            workspace_id: workspace_id.clone(),
            save_context,
            metadata,
        };
        self.bridge.send(Operation::SaveLayout, &request).await
    }

    pub async fn delete(&self, name: impl Into<String>) -> Result<()> {
        let request = DeleteLayoutRequest { name: name.into() };
        let _: Empty = self.bridge.send(Operation::DeleteLayout, &request).await?;
        Ok(())
    }

    pub async fn import(&self, layouts: Vec<WorkspaceLayout>, mode: ImportMode) -> Result<()> {
        let request = ImportLayoutRequest { layouts, mode };
        let _: Empty = self.bridge.send(Operation::ImportLayout, &request).await?;
        Ok(())
    }

    pub async fn export(&self) -> Result<Vec<WorkspaceLayout>> {
        let result: LayoutsResult = self
            .bridge
            .send(Operation::ExportAllLayouts, &EmptyRequest::default())
            .await?;
        Ok(result.layouts)
    }

    pub async fn summaries(&self) -> Result<Vec<LayoutSummary>> {
        let result: LayoutSummaries = self
            .bridge
            .send(Operation::GetAllLayoutsSummaries, &EmptyRequest::default())
            .await?;
        Ok(result.summaries)
    }
}
