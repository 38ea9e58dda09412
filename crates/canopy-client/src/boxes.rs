//! Row, column, group and window facades.
//!
//! Every facade is an index into a [`WorkspaceTree`] shared with its
//! siblings. Reads come from that tree; mutations go through the bridge
//! and return facades built from a fresh snapshot, leaving the caller's
//! own copy as it was until [`BoxRef::refresh_reference`] is called.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use canopy_common::{BoxType, CanopyError, FrameId, ItemId, ItemKind, Result, WorkspaceId};
use canopy_protocol::requests::{
    AddContainerRequest, AddWindowRequest, ItemRequest, LockContainerRequest, LockWindowRequest,
    MoveWindowToRequest, ParentType, ResizeItemRequest, SetItemTitleRequest,
};
use canopy_protocol::responses::{AddItemResult, Empty, WindowIdResult};
use canopy_protocol::{BoxDefinition, LockConfig, Operation};
use serde_json::Value;

use crate::arena::{Entry, WorkspaceTree};
use crate::bridge::Bridge;
use crate::locks::LockUpdate;
use crate::workspace::Workspace;

/// What every box offers regardless of its type.
#[derive(Clone)]
pub struct BoxRef {
    bridge: Bridge,
    tree: Arc<WorkspaceTree>,
    index: usize,
}

impl BoxRef {
    pub(crate) fn new(bridge: Bridge, tree: Arc<WorkspaceTree>, index: usize) -> Self {
        Self { bridge, tree, index }
    }

    fn entry(&self) -> &Entry {
        self.tree.entry(self.index)
    }

    fn sibling(&self, index: usize) -> BoxItem {
        BoxItem::from(BoxRef::new(self.bridge.clone(), Arc::clone(&self.tree), index))
    }

    pub fn id(&self) -> &ItemId {
        &self.entry().id
    }

    pub fn box_type(&self) -> BoxType {
        self.entry().box_type
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        self.tree.id()
    }

    pub fn frame_id(&self) -> &FrameId {
        self.tree.frame_id()
    }

    pub fn position_index(&self) -> usize {
        self.entry().config.position_index
    }

    pub fn min_width(&self) -> u32 {
        self.entry().config.min_width
    }

    pub fn max_width(&self) -> u32 {
        self.entry().config.max_width
    }

    pub fn min_height(&self) -> u32 {
        self.entry().config.min_height
    }

    pub fn max_height(&self) -> u32 {
        self.entry().config.max_height
    }

    pub fn width(&self) -> u32 {
        self.entry().config.width
    }

    pub fn height(&self) -> u32 {
        self.entry().config.height
    }

    pub fn is_maximized(&self) -> bool {
        self.entry().config.is_maximized
    }

    /// Resolved lock flags: explicit ones plus everything inherited.
    pub fn locks(&self) -> &LockConfig {
        &self.entry().config.locks
    }

    /// The containing box, or `None` directly under the workspace.
    pub fn parent(&self) -> Option<BoxItem> {
        self.entry().parent.map(|index| self.sibling(index))
    }

    pub fn children(&self) -> Vec<BoxItem> {
        self.entry()
            .children
            .iter()
            .map(|&index| self.sibling(index))
            .collect()
    }

    /// A fresh view of the owning workspace.
    pub async fn workspace(&self) -> Result<Workspace> {
        let tree = self.bridge.workspace_tree(self.workspace_id()).await?;
        Ok(Workspace::new(self.bridge.clone(), tree))
    }

    pub async fn focus(&self) -> Result<()> {
        self.item_call(Operation::FocusItem).await
    }

    pub async fn close(&self) -> Result<()> {
        self.item_call(Operation::CloseItem).await
    }

    pub async fn maximize(&self) -> Result<()> {
        self.item_call(Operation::MaximizeItem).await
    }

    pub async fn restore(&self) -> Result<()> {
        self.item_call(Operation::RestoreItem).await
    }

    /// Sets the box's size along its parent's axis, clamped by the frame.
    pub async fn resize(&self, width: Option<i32>, height: Option<i32>) -> Result<()> {
        self.send_resize(width, height, false).await
    }

    pub async fn resize_by(&self, width: Option<i32>, height: Option<i32>) -> Result<()> {
        self.send_resize(width, height, true).await
    }

    async fn send_resize(&self, width: Option<i32>, height: Option<i32>, relative: bool) -> Result<()> {
        let request = ResizeItemRequest {
            item_id: self.id().clone(),
            width,
            height,
            relative,
        };
        let _: Empty = self.bridge.send(Operation::ResizeItem, &request).await?;
        Ok(())
    }

    async fn item_call(&self, operation: Operation) -> Result<()> {
        let _: Empty = self
            .bridge
            .send(operation, &ItemRequest::new(self.id().clone()))
            .await?;
        Ok(())
    }

    /// Rebuilds this facade from a fresh snapshot. Fails with `NotFound`
    /// once the box is gone.
    pub async fn refresh_reference(&mut self) -> Result<()> {
        let id = self.id().clone();
        let tree = self.bridge.tree_of(&id).await?;
        let index = tree
            .lookup(&id)
            .ok_or_else(|| CanopyError::not_found(ItemKind::Item, id.as_str()))?;
        self.tree = tree;
        self.index = index;
        Ok(())
    }

    async fn add_child(&self, expected: BoxType, definition: Option<BoxDefinition>) -> Result<BoxRef> {
        let parent_type = match self.box_type() {
            BoxType::Row => ParentType::Row,
            BoxType::Column => ParentType::Column,
            BoxType::Group => ParentType::Group,
            BoxType::Window => {
                return Err(CanopyError::UnsupportedOperation(
                    "a window has no children".into(),
                ))
            }
        };
        add_box(
            &self.bridge,
            self.workspace_id(),
            self.id(),
            parent_type,
            expected,
            definition,
        )
        .await
    }

    async fn lock_container(&self, update: LockUpdate) -> Result<()> {
        let request = LockContainerRequest {
            item_id: self.id().clone(),
            container_type: self.box_type(),
            config: update.resolve(self.locks()),
        };
        let _: Empty = self.bridge.send(Operation::LockContainer, &request).await?;
        Ok(())
    }
}

impl fmt::Debug for BoxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxRef")
            .field("id", self.id())
            .field("type", &self.box_type())
            .field("workspace_id", self.workspace_id())
            .finish()
    }
}

/// The type a definition asks for when handed to a typed `add_*` call.
fn requested_type(definition: &BoxDefinition, expected: BoxType) -> BoxType {
    match definition.box_type {
        Some(box_type) => box_type,
        None if definition.app_name.is_some() => BoxType::Window,
        None => expected,
    }
}

/// Adds `expected` under `parent_id` and returns it from a fresh snapshot.
///
/// The definition's own type, if any, must agree with `expected`; a child
/// the parent cannot hold is refused here, before anything is sent.
pub(crate) async fn add_box(
    bridge: &Bridge,
    workspace: &WorkspaceId,
    parent_id: &ItemId,
    parent_type: ParentType,
    expected: BoxType,
    definition: Option<BoxDefinition>,
) -> Result<BoxRef> {
    let mut definition = definition.unwrap_or_default();
    let child = requested_type(&definition, expected);
    let parent = parent_type.box_type();
    let operation = if expected == BoxType::Window {
        Operation::AddWindow
    } else {
        Operation::AddContainer
    };

    if let Some(parent) = parent {
        if !parent.can_contain(child) {
            return Err(CanopyError::InvalidChildType {
                parent: parent.as_str().to_string(),
                child,
            });
        }
    }
    if child != expected {
        return Err(CanopyError::validation(
            operation.as_str(),
            format!("expected a {expected} definition, got a {child}"),
        ));
    }
    definition.box_type = Some(expected);

    let result: AddItemResult = if expected == BoxType::Window {
        let request = AddWindowRequest {
            definition,
            parent_id: parent_id.clone(),
            parent_type,
        };
        bridge.send(operation, &request).await?
    } else {
        let request = AddContainerRequest {
            definition,
            parent_id: parent_id.clone(),
            parent_type,
        };
        bridge.send(operation, &request).await?
    };
    if !result.constraints_applied {
        tracing::debug!(item_id = %result.item_id, "requested constraints were dropped");
    }

    let tree = bridge.workspace_tree(workspace).await?;
    let index = tree
        .lookup(&result.item_id)
        .ok_or_else(|| CanopyError::not_found(ItemKind::Item, result.item_id.as_str()))?;
    Ok(BoxRef::new(bridge.clone(), tree, index))
}

macro_rules! facade {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug)]
        pub struct $name(pub(crate) BoxRef);

        impl Deref for $name {
            type Target = BoxRef;

            fn deref(&self) -> &BoxRef {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut BoxRef {
                &mut self.0
            }
        }
    };
}

facade!(
    /// A horizontal split.
    Row
);
facade!(
    /// A vertical split.
    Column
);
facade!(
    /// A tab stack of windows.
    Group
);
facade!(Window);

impl Row {
    /// Adds a column; with no definition the column starts empty.
    pub async fn add_column(&self, definition: Option<BoxDefinition>) -> Result<Column> {
        self.add_child(BoxType::Column, definition).await.map(Column)
    }

    pub async fn add_group(&self, definition: Option<BoxDefinition>) -> Result<Group> {
        self.add_child(BoxType::Group, definition).await.map(Group)
    }

    pub async fn add_window(&self, definition: BoxDefinition) -> Result<Window> {
        self.add_child(BoxType::Window, Some(definition)).await.map(Window)
    }

    pub async fn lock(&self, update: impl Into<LockUpdate>) -> Result<()> {
        self.lock_container(update.into()).await
    }
}

impl Column {
    pub async fn add_row(&self, definition: Option<BoxDefinition>) -> Result<Row> {
        self.add_child(BoxType::Row, definition).await.map(Row)
    }

    pub async fn add_group(&self, definition: Option<BoxDefinition>) -> Result<Group> {
        self.add_child(BoxType::Group, definition).await.map(Group)
    }

    pub async fn add_window(&self, definition: BoxDefinition) -> Result<Window> {
        self.add_child(BoxType::Window, Some(definition)).await.map(Window)
    }

    pub async fn lock(&self, update: impl Into<LockUpdate>) -> Result<()> {
        self.lock_container(update.into()).await
    }
}

impl Group {
    pub async fn add_window(&self, definition: BoxDefinition) -> Result<Window> {
        self.add_child(BoxType::Window, Some(definition)).await.map(Window)
    }

    pub async fn lock(&self, update: impl Into<LockUpdate>) -> Result<()> {
        self.lock_container(update.into()).await
    }
}

impl Window {
    fn config(&self) -> &canopy_protocol::BoxSnapshotConfig {
        &self.0.entry().config
    }

    pub fn app_name(&self) -> &str {
        self.config().app_name.as_deref().unwrap_or_default()
    }

    /// The native window id, absent until the window has loaded.
    pub fn window_id(&self) -> Option<&str> {
        self.config().window_id.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.config().is_loaded.unwrap_or(false)
    }

    pub fn is_focused(&self) -> bool {
        self.config().is_focused.unwrap_or(false)
    }

    pub fn title(&self) -> Option<&str> {
        self.config().title.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.config().url.as_deref()
    }

    pub fn context(&self) -> Option<&Value> {
        self.config().context.as_ref()
    }

    pub async fn set_title(&self, title: impl Into<String>) -> Result<()> {
        let request = SetItemTitleRequest {
            item_id: self.id().clone(),
            title: title.into(),
        };
        let _: Empty = self.bridge.send(Operation::SetItemTitle, &request).await?;
        Ok(())
    }

    /// Loads the window even if its workspace is not selected.
    pub async fn force_load(&self) -> Result<String> {
        self.window_call(Operation::ForceLoadWindow).await
    }

    /// Takes the window out of its workspace into a standalone native
    /// window and returns that window's id.
    pub async fn eject(&self) -> Result<String> {
        self.window_call(Operation::EjectWindow).await
    }

    /// Moves the window into `container`, which may live in another
    /// workspace or frame.
    pub async fn move_to(&self, container: &ItemId) -> Result<()> {
        let request = MoveWindowToRequest {
            item_id: self.id().clone(),
            container_id: container.clone(),
        };
        let _: Empty = self.bridge.send(Operation::MoveWindowTo, &request).await?;
        Ok(())
    }

    pub async fn lock(&self, update: impl Into<LockUpdate>) -> Result<()> {
        let request = LockWindowRequest {
            item_id: self.id().clone(),
            config: update.into().resolve(self.locks()),
        };
        let _: Empty = self.bridge.send(Operation::LockWindow, &request).await?;
        Ok(())
    }

    async fn window_call(&self, operation: Operation) -> Result<String> {
        let result: WindowIdResult = self
            .bridge
            .send(operation, &ItemRequest::new(self.id().clone()))
            .await?;
        Ok(result.window_id)
    }
}

/// A box of any type.
#[derive(Clone, Debug)]
pub enum BoxItem {
    Row(Row),
    Column(Column),
    Group(Group),
    Window(Window),
}

impl From<BoxRef> for BoxItem {
    fn from(base: BoxRef) -> Self {
        match base.box_type() {
            BoxType::Row => BoxItem::Row(Row(base)),
            BoxType::Column => BoxItem::Column(Column(base)),
            BoxType::Group => BoxItem::Group(Group(base)),
            BoxType::Window => BoxItem::Window(Window(base)),
        }
    }
}

impl Deref for BoxItem {
    type Target = BoxRef;

    fn deref(&self) -> &BoxRef {
        match self {
            BoxItem::Row(b) => &b.0,
            BoxItem::Column(b) => &b.0,
            BoxItem::Group(b) => &b.0,
            BoxItem::Window(b) => &b.0,
        }
    }
}

impl BoxItem {
    pub fn into_row(self) -> Option<Row> {
        match self {
            BoxItem::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn into_column(self) -> Option<Column> {
        match self {
            BoxItem::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn into_group(self) -> Option<Group> {
        match self {
            BoxItem::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn into_window(self) -> Option<Window> {
        match self {
            BoxItem::Window(window) => Some(window),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_naming_an_app_are_windows() {
        assert_eq!(
            requested_type(&BoxDefinition::window("notes"), BoxType::Column),
            BoxType::Window
        );
        let mut bare = BoxDefinition::default();
        assert_eq!(requested_type(&bare, BoxType::Group), BoxType::Group);
        bare.app_name = Some("notes".into());
        assert_eq!(requested_type(&bare, BoxType::Group), BoxType::Window);
        let typed = BoxDefinition::container(BoxType::Row, vec![]);
        assert_eq!(requested_type(&typed, BoxType::Column), BoxType::Row);
    }
}
