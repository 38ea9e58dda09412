//! The frame record, lookups and read-only views.

use canopy_common::{
    CanopyError, Event, EventAction, EventType, FrameId, ItemId, ItemKind, Size, WorkspaceId,
};
use canopy_protocol::{
    BoxSnapshot, FrameSnapshot, FrameSummary, WorkspaceSnapshot, WorkspaceSummary,
};
use serde_json::Value;

use crate::tree::{Node, NodeKind};
use crate::workspace::{Placement, Workspace};

/// Everything one frame hosts: its workspaces in tab order, the area they
/// fill, and the events produced by mutations not yet handed out.
#[derive(Debug)]
pub struct FrameModel {
    pub(super) id: FrameId,
    pub(super) size: Size,
    pub(super) workspaces: Vec<Workspace>,
    pub(super) events: Vec<Event>,
    /// Counter behind "Untitled N" titles.
    pub(super) untitled: usize,
}

/// Where an item id points inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    Workspace(usize),
    Box { workspace: usize, kind: NodeKind },
}

impl Located {
    pub fn workspace_index(&self) -> usize {
        match self {
            Located::Workspace(index) => *index,
            Located::Box { workspace, .. } => *workspace,
        }
    }
}

impl FrameModel {
    pub fn new(id: FrameId, size: Size) -> Self {
        Self {
            id,
            size,
            workspaces: Vec::new(),
            events: Vec::new(),
            untitled: 0,
        }
    }

    // -- Accessors --

    pub fn id(&self) -> &FrameId {
        &self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn selected(&self) -> Option<&Workspace> {
        self.workspaces.iter().find(|ws| ws.is_selected())
    }

    pub fn workspace_index(&self, id: &WorkspaceId) -> Result<usize, CanopyError> {
        self.workspaces
            .iter()
            .position(|ws| ws.id() == id)
            .ok_or_else(|| CanopyError::not_found(ItemKind::Workspace, id.as_str()))
    }

    pub fn workspace(&self, id: &WorkspaceId) -> Result<&Workspace, CanopyError> {
        Ok(&self.workspaces[self.workspace_index(id)?])
    }

    /// Finds the workspace or box `id` names.
    pub fn locate(&self, id: &ItemId) -> Option<Located> {
        self.workspaces.iter().enumerate().find_map(|(index, ws)| {
            if ws.root_id() == *id {
                Some(Located::Workspace(index))
            } else {
                ws.tree().get(id).map(|node| Located::Box {
                    workspace: index,
                    kind: node.kind,
                })
            }
        })
    }

    pub(super) fn require(&self, id: &ItemId) -> Result<Located, CanopyError> {
        self.locate(id)
            .ok_or_else(|| CanopyError::not_found(ItemKind::Item, id.as_str()))
    }

    /// The window whose native handle is `window_id`, with its workspace.
    pub fn find_window(&self, window_id: &str) -> Option<(&Workspace, &Node)> {
        self.workspaces
            .iter()
            .find_map(|ws| ws.tree().find_by_window_id(window_id).map(|node| (ws, node)))
    }

    pub fn is_window_in_workspace(&self, window_id: &str) -> bool {
        self.find_window(window_id).is_some()
    }

    // -- Views --

    pub(super) fn placement(&self, index: usize) -> Placement<'_> {
        Placement {
            frame_id: &self.id,
            position_index: index,
            viewport: self.size,
        }
    }

    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            id: self.id.clone(),
            workspace_count: self.workspaces.len(),
            selected_workspace_id: self.selected().map(|ws| ws.id().clone()),
        }
    }

    pub fn workspace_summaries(&self) -> Vec<WorkspaceSummary> {
        self.workspaces
            .iter()
            .enumerate()
            .map(|(index, ws)| ws.summary(self.placement(index)))
            .collect()
    }

    pub fn workspace_snapshot(&self, id: &WorkspaceId) -> Result<WorkspaceSnapshot, CanopyError> {
        let index = self.workspace_index(id)?;
        Ok(self.workspaces[index].snapshot(self.placement(index), self.summary()))
    }

    /// Snapshot of the workspace that owns item `id` (the workspace itself
    /// or any box in it).
    pub fn snapshot_of_item(&self, id: &ItemId) -> Result<WorkspaceSnapshot, CanopyError> {
        let index = self.require(id)?.workspace_index();
        Ok(self.workspaces[index].snapshot(self.placement(index), self.summary()))
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let summary = self.summary();
        FrameSnapshot {
            id: self.id.clone(),
            workspaces: self
                .workspaces
                .iter()
                .enumerate()
                .map(|(index, ws)| ws.snapshot(self.placement(index), summary.clone()))
                .collect(),
        }
    }

    pub(super) fn box_snapshot(&self, index: usize, id: &ItemId) -> Option<BoxSnapshot> {
        self.workspaces[index].box_snapshot_of(id, self.placement(index))
    }

    // -- Events --

    /// Hands out queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn emit(
        &mut self,
        event_type: EventType,
        action: EventAction,
        workspace: Option<&WorkspaceId>,
        item: Option<&ItemId>,
        payload: Value,
    ) {
        let mut event = Event::new(event_type, action, self.id.clone()).with_payload(payload);
        if let Some(workspace) = workspace {
            event = event.with_workspace(workspace.clone());
        }
        if let Some(item) = item {
            event = event.with_item(item.clone());
        }
        self.events.push(event);
    }

    pub(super) fn emit_workspace(&mut self, index: usize, action: EventAction) {
        let summary = self.workspaces[index].summary(self.placement(index));
        let id = summary.id.clone();
        let payload = serde_json::to_value(&summary).unwrap_or(Value::Null);
        self.emit(EventType::Workspace, action, Some(&id), Some(&ItemId::from(&id)), payload);
    }

    /// Event for a live box, carrying its snapshot.
    pub(super) fn emit_box(&mut self, index: usize, id: &ItemId, action: EventAction) {
        let Some(snapshot) = self.box_snapshot(index, id) else {
            return;
        };
        let event_type = event_type_of(snapshot.box_type == canopy_common::BoxType::Window);
        let workspace = self.workspaces[index].id().clone();
        let payload = serde_json::to_value(&snapshot).unwrap_or(Value::Null);
        self.emit(event_type, action, Some(&workspace), Some(id), payload);
    }

    /// Events for nodes that have already left the tree.
    pub(super) fn emit_removed(&mut self, workspace: &WorkspaceId, removed: &[Node]) {
        for node in removed {
            let payload = serde_json::json!({
                "id": node.id,
                "type": node.kind.as_str(),
                "appName": node.window.as_ref().map(|w| w.app_name.clone()),
                "windowId": node.window.as_ref().and_then(|w| w.window_id.clone()),
            });
            self.emit(
                event_type_of(node.is_window()),
                EventAction::Removed,
                Some(workspace),
                Some(&node.id),
                payload,
            );
        }
    }

    pub(super) fn emit_frame(&mut self, action: EventAction) {
        let payload = serde_json::to_value(self.summary()).unwrap_or(Value::Null);
        let item = ItemId::from(&self.id);
        self.emit(EventType::Frame, action, None, Some(&item), payload);
    }
}

fn event_type_of(is_window: bool) -> EventType {
    if is_window {
        EventType::Window
    } else {
        EventType::Container
    }
}
