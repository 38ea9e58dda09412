use std::sync::Arc;

use canopy_common::{FrameId, ItemId, Result, WorkspaceId};
use canopy_protocol::requests::{
    CreateWorkspaceRequest, FrameSelector, ItemRequest, MoveFrameRequest, ResizeItemRequest,
};
use canopy_protocol::responses::Empty;
use canopy_protocol::{FrameSnapshot, FrameSummary, Operation, WorkspaceSnapshot};

use crate::arena::WorkspaceTree;
use crate::bridge::Bridge;
use crate::workspace::Workspace;

/// A frame: one native window hosting workspaces.
#[derive(Clone)]
pub struct Frame {
    bridge: Bridge,
    summary: FrameSummary,
}

impl Frame {
    pub(crate) fn new(bridge: Bridge, summary: FrameSummary) -> Self {
        Self { bridge, summary }
    }

    pub(crate) async fn fetch(bridge: &Bridge, id: &FrameId) -> Result<Self> {
        let summary: FrameSummary = bridge
            .send(Operation::GetFrameSummary, &ItemRequest::new(id))
            .await?;
        Ok(Self::new(bridge.clone(), summary))
    }

    pub fn id(&self) -> &FrameId {
        &self.summary.id
    }

    pub fn summary(&self) -> &FrameSummary {
        &self.summary
    }

    pub fn workspace_count(&self) -> usize {
        self.summary.workspace_count
    }

    pub fn selected_workspace_id(&self) -> Option<&WorkspaceId> {
        self.summary.selected_workspace_id.as_ref()
    }

    pub async fn workspaces(&self) -> Result<Vec<Workspace>> {
        let snapshot: FrameSnapshot = self
            .bridge
            .send(Operation::GetFrameSnapshot, &ItemRequest::new(self.id()))
            .await?;
        Ok(snapshot
            .workspaces
            .into_iter()
            .map(|ws| Workspace::new(self.bridge.clone(), Arc::new(WorkspaceTree::from_snapshot(ws))))
            .collect())
    }

    /// Creates a workspace in this frame, whatever selector `request`
    /// carried.
    pub async fn create_workspace(&self, mut request: CreateWorkspaceRequest) -> Result<Workspace> {
        request.frame = Some(FrameSelector::by_frame(self.id().clone()));
        let snapshot: WorkspaceSnapshot = self
            .bridge
            .send(Operation::CreateWorkspace, &request)
            .await?;
        Ok(Workspace::new(
            self.bridge.clone(),
            Arc::new(WorkspaceTree::from_snapshot(snapshot)),
        ))
    }

    pub async fn resize(&self, width: Option<i32>, height: Option<i32>) -> Result<()> {
        self.send_resize(width, height, false).await
    }

    pub async fn resize_by(&self, width: Option<i32>, height: Option<i32>) -> Result<()> {
        self.send_resize(width, height, true).await
    }

    async fn send_resize(&self, width: Option<i32>, height: Option<i32>, relative: bool) -> Result<()> {
        let request = ResizeItemRequest {
            item_id: ItemId::from(self.id()),
            width,
            height,
            relative,
        };
        let _: Empty = self.bridge.send(Operation::ResizeItem, &request).await?;
        Ok(())
    }

    pub async fn move_to(&self, left: Option<i32>, top: Option<i32>) -> Result<()> {
        self.send_move(left, top, false).await
    }

    pub async fn move_by(&self, left: Option<i32>, top: Option<i32>) -> Result<()> {
        self.send_move(left, top, true).await
    }

    async fn send_move(&self, left: Option<i32>, top: Option<i32>, relative: bool) -> Result<()> {
        let request = MoveFrameRequest {
            item_id: ItemId::from(self.id()),
            top,
            left,
            relative,
        };
        let _: Empty = self.bridge.send(Operation::MoveFrame, &request).await?;
        Ok(())
    }

    pub async fn focus(&self) -> Result<()> {
        self.item_call(Operation::FocusItem).await
    }

    /// Closes the frame window and every workspace in it.
    pub async fn close(&self) -> Result<()> {
        self.item_call(Operation::CloseItem).await
    }

    pub async fn refresh_reference(&mut self) -> Result<()> {
        let fresh = Frame::fetch(&self.bridge, self.id()).await?;
        self.summary = fresh.summary;
        Ok(())
    }

    async fn item_call(&self, operation: Operation) -> Result<()> {
        let _: Empty = self
            .bridge
            .send(operation, &ItemRequest::new(self.id()))
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame").field("summary", &self.summary).finish()
    }
}
