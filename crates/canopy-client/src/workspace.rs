use std::sync::Arc;

use canopy_common::{BoxType, EventAction, EventType, FrameId, ItemId, Result, WorkspaceId};
use canopy_protocol::requests::{
    BundleType, BundleWorkspaceRequest, ItemRequest, LockWorkspaceRequest, ParentType,
    SaveLayoutRequest, SetItemTitleRequest, WorkspaceRequest,
};
use canopy_protocol::responses::Empty;
use canopy_protocol::{BoxDefinition, FrameSummary, LockConfig, Operation, WorkspaceLayout};
use serde_json::Value;

use crate::arena::WorkspaceTree;
use crate::boxes::{add_box, BoxItem, BoxRef, Column, Group, Row, Window};
use crate::bridge::Bridge;
use crate::events::{EventFilter, Subscription};
use crate::frame::Frame;
use crate::locks::LockUpdate;

/// A workspace as of its last snapshot.
#[derive(Clone)]
pub struct Workspace {
    bridge: Bridge,
    tree: Arc<WorkspaceTree>,
}

impl Workspace {
    pub(crate) fn new(bridge: Bridge, tree: Arc<WorkspaceTree>) -> Self {
        Self { bridge, tree }
    }

    pub fn id(&self) -> &WorkspaceId {
        self.tree.id()
    }

    pub fn frame_id(&self) -> &FrameId {
        self.tree.frame_id()
    }

    pub fn title(&self) -> &str {
        &self.tree.config.title
    }

    pub fn position_index(&self) -> usize {
        self.tree.config.position_index
    }

    pub fn is_selected(&self) -> bool {
        self.tree.config.is_selected
    }

    pub fn is_hibernated(&self) -> bool {
        self.tree.config.is_hibernated
    }

    /// Name of the saved layout this workspace was opened from.
    pub fn layout_name(&self) -> Option<&str> {
        self.tree.config.layout_name.as_deref()
    }

    pub fn last_active(&self) -> i64 {
        self.tree.config.last_active
    }

    pub fn context(&self) -> &Value {
        &self.tree.context
    }

    pub fn min_width(&self) -> u32 {
        self.tree.config.min_width
    }

    pub fn max_width(&self) -> u32 {
        self.tree.config.max_width
    }

    pub fn min_height(&self) -> u32 {
        self.tree.config.min_height
    }

    pub fn max_height(&self) -> u32 {
        self.tree.config.max_height
    }

    pub fn locks(&self) -> &LockConfig {
        &self.tree.config.locks
    }

    pub fn frame_summary(&self) -> &FrameSummary {
        &self.tree.frame
    }

    pub fn tree(&self) -> &WorkspaceTree {
        &self.tree
    }

    fn item(&self, index: usize) -> BoxItem {
        BoxItem::from(BoxRef::new(self.bridge.clone(), Arc::clone(&self.tree), index))
    }

    pub fn children(&self) -> Vec<BoxItem> {
        self.tree.roots.iter().map(|&index| self.item(index)).collect()
    }

    /// Every box in the workspace, depth first.
    pub fn get_all_boxes(&self) -> Vec<BoxItem> {
        self.tree.depth_first().map(|index| self.item(index)).collect()
    }

    pub fn get_box(&self, id: &ItemId) -> Option<BoxItem> {
        self.tree.lookup(id).map(|index| self.item(index))
    }

    pub fn get_all_windows(&self) -> Vec<Window> {
        self.get_all_boxes()
            .into_iter()
            .filter_map(BoxItem::into_window)
            .collect()
    }

    async fn add(&self, expected: BoxType, definition: Option<BoxDefinition>) -> Result<BoxRef> {
        add_box(
            &self.bridge,
            self.id(),
            &ItemId::from(self.id()),
            ParentType::Workspace,
            expected,
            definition,
        )
        .await
    }

    pub async fn add_row(&self, definition: Option<BoxDefinition>) -> Result<Row> {
        self.add(BoxType::Row, definition).await.map(Row)
    }

    pub async fn add_column(&self, definition: Option<BoxDefinition>) -> Result<Column> {
        self.add(BoxType::Column, definition).await.map(Column)
    }

    pub async fn add_group(&self, definition: Option<BoxDefinition>) -> Result<Group> {
        self.add(BoxType::Group, definition).await.map(Group)
    }

    pub async fn add_window(&self, definition: BoxDefinition) -> Result<Window> {
        self.add(BoxType::Window, Some(definition)).await.map(Window)
    }

    /// Selects this workspace in its frame and focuses the frame.
    pub async fn focus(&self) -> Result<()> {
        self.item_call(Operation::FocusItem).await
    }

    /// Closes the workspace and every window in it.
    pub async fn close(&self) -> Result<()> {
        self.item_call(Operation::CloseItem).await
    }

    pub async fn set_title(&self, title: impl Into<String>) -> Result<()> {
        let request = SetItemTitleRequest {
            item_id: ItemId::from(self.id()),
            title: title.into(),
        };
        let _: Empty = self.bridge.send(Operation::SetItemTitle, &request).await?;
        Ok(())
    }

    pub async fn hibernate(&self) -> Result<()> {
        self.workspace_call(Operation::HibernateWorkspace).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.workspace_call(Operation::ResumeWorkspace).await
    }

    /// Wraps the top-level boxes into a single row or column.
    pub async fn bundle(&self, bundle_type: BundleType) -> Result<()> {
        let request = BundleWorkspaceRequest {
            workspace_id: self.id().clone(),
            bundle_type,
        };
        let _: Empty = self.bridge.send(Operation::BundleWorkspace, &request).await?;
        Ok(())
    }

    pub async fn lock(&self, update: impl Into<LockUpdate>) -> Result<()> {
        let request = LockWorkspaceRequest {
            workspace_id: self.id().clone(),
            config: update.into().resolve(self.locks()),
        };
        let _: Empty = self.bridge.send(Operation::LockWorkspace, &request).await?;
        Ok(())
    }

    /// Saves the current shape under `name`, replacing any layout already
    /// stored with that name.
    pub async fn save_layout(
        &self,
        name: impl Into<String>,
        save_context: bool,
    ) -> Result<WorkspaceLayout> {
        let request = SaveLayoutRequest {
            name: name.into(),
            workspace_id: self.id().clone(),
            save_context,
            metadata: None,
        };
        self.bridge.send(Operation::SaveLayout, &request).await
    }

    pub async fn frame(&self) -> Result<Frame> {
        Frame::fetch(&self.bridge, self.frame_id()).await
    }

    /// Replaces this view with a fresh snapshot.
    pub async fn refresh_reference(&mut self) -> Result<()> {
        self.tree = self.bridge.workspace_tree(self.id()).await?;
        Ok(())
    }

    /// Events of `event_type`/`action` raised inside this workspace.
    pub fn on(&self, event_type: EventType, action: EventAction) -> Subscription {
        Subscription::new(
            self.bridge.events(),
            EventFilter::new(event_type, action).in_workspace(self.id().clone()),
        )
    }

    pub fn on_window_added(&self) -> Subscription {
        self.on(EventType::Window, EventAction::Added)
    }

    pub fn on_window_removed(&self) -> Subscription {
        self.on(EventType::Window, EventAction::Removed)
    }

    async fn item_call(&self, operation: Operation) -> Result<()> {
        let _: Empty = self
            .bridge
            .send(operation, &ItemRequest::new(self.id()))
            .await?;
        Ok(())
    }

    async fn workspace_call(&self, operation: Operation) -> Result<()> {
        let _: Empty = self
            .bridge
            .send(operation, &WorkspaceRequest::new(self.id().clone()))
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("id", self.id())
            .field("frame_id", self.frame_id())
            .field("title", &self.title())
            .field("boxes", &self.tree.box_count())
            .finish()
    }
}
