//! Frame-level mutations. Each one updates the model and queues the events
//! describing what changed.

use canopy_common::{monotonic_millis, BoxType, CanopyError, EventAction, ItemId, WorkspaceId};
use canopy_protocol::{BoxDefinition, LockFlag, LockTarget, WorkspaceLayout};
use serde_json::Value;

use super::types::{FrameModel, Located};
use crate::geometry::Extent;
use crate::locking::LockRequest;
use crate::tree::{Node, NodeKind, WindowState};
use crate::workspace::{AddOutcome, Workspace, WorkspaceOptions};

impl FrameModel {
    fn next_title(&mut self) -> String {
        self.untitled += 1;
        format!("Untitled {}", self.untitled)
    }

    fn insert(&mut self, workspace: Workspace, select: bool) -> WorkspaceId {
        let id = workspace.id().clone();
        let root = workspace.root_id();
        self.workspaces.push(workspace);
        let index = self.workspaces.len() - 1;
        tracing::info!(frame_id = %self.id, workspace_id = %id, "workspace opened");

        self.emit_workspace(index, EventAction::Opened);
        self.emit_subtree_added(index, &root);
        if select || self.selected().is_none() {
            self.select_at(index);
        }
        id
    }

    /// Creates a workspace from `definitions`. Returns its id and whether
    /// every requested constraint set was applied.
    pub fn create_workspace(
        &mut self,
        options: WorkspaceOptions,
        definitions: &[BoxDefinition],
        select: bool,
    ) -> Result<(WorkspaceId, bool), CanopyError> {
        let fallback = self.next_title();
        let (workspace, applied) = Workspace::build(options, &fallback, definitions)?;
        Ok((self.insert(workspace, select), applied))
    }

    fn select_at(&mut self, index: usize) {
        for (i, ws) in self.workspaces.iter_mut().enumerate() {
            if i != index {
                ws.set_selected(false);
            }
        }
        let ws = &mut self.workspaces[index];
        ws.set_selected(true);
        ws.touch(monotonic_millis());
        self.emit_workspace(index, EventAction::Selected);
    }

    /// Makes `id` the selected workspace, resuming it first if hibernated.
    pub fn select_workspace(&mut self, id: &WorkspaceId) -> Result<(), CanopyError> {
        let index = self.workspace_index(id)?;
        if self.workspaces[index].is_hibernated() {
            self.resume_at(index)?;
        }
        self.select_at(index);
        Ok(())
    }

    /// Removes a workspace. Returns its removed nodes so their native
    /// windows can be closed.
    pub fn close_workspace(&mut self, id: &WorkspaceId) -> Result<Vec<Node>, CanopyError> {
        let index = self.workspace_index(id)?;
        let root = self.workspaces[index].root_id();
        let removed = self.workspaces[index].close_item(&root)?;
        self.emit_removed(id, &removed);
        self.emit_workspace(index, EventAction::Closed);

        let closed = self.workspaces.remove(index);
        tracing::info!(frame_id = %self.id, workspace_id = %id, "workspace closed");
        if closed.is_selected() {
            let next = self
                .workspaces
                .iter()
                .enumerate()
                .max_by_key(|(_, ws)| ws.last_active())
                .map(|(i, _)| i);
            if let Some(next) = next {
                self.select_at(next);
            }
        }
        Ok(removed)
    }

    /// Closes every workspace, for a frame whose native window is gone.
    pub fn close_all(&mut self) -> Vec<Node> {
        let ids: Vec<WorkspaceId> = self.workspaces.iter().map(|ws| ws.id().clone()).collect();
        let mut removed = Vec::new();
        for id in ids {
            match self.close_workspace(&id) {
                Ok(nodes) => removed.extend(nodes),
                Err(err) => tracing::warn!(workspace_id = %id, error = %err, "close failed"),
            }
        }
        self.emit_frame(EventAction::Closed);
        removed
    }

    /// Adds `definition` under `parent`, which must be of `expected` kind
    /// when given.
    pub fn add_box(
        &mut self,
        parent: &ItemId,
        expected: Option<NodeKind>,
        definition: &BoxDefinition,
    ) -> Result<AddOutcome, CanopyError> {
        let located = self.require(parent)?;
        let index = located.workspace_index();
        let actual = match located {
            Located::Workspace(_) => NodeKind::Workspace,
            Located::Box { kind, .. } => kind,
        };
        if let Some(expected) = expected {
            if expected != actual {
                return Err(CanopyError::validation(
                    "addBox",
                    format!("parent {parent} is a {}, not a {}", actual.as_str(), expected.as_str()),
                ));
            }
        }

        let outcome = self.workspaces[index].add_box(parent, definition)?;
        self.emit_subtree_added(index, &outcome.id);
        self.emit_children_update(index, parent);
        Ok(outcome)
    }

    fn emit_subtree_added(&mut self, index: usize, id: &ItemId) {
        let tree = self.workspaces[index].tree();
        let mut ids = tree.descendants(id);
        if tree.root() != id {
            ids.insert(0, id.clone());
        }
        for id in ids {
            self.emit_box(index, &id, EventAction::Added);
        }
    }

    fn emit_children_update(&mut self, index: usize, parent: &ItemId) {
        if self.workspaces[index].root_id() == *parent {
            self.emit_workspace(index, EventAction::ChildrenUpdate);
        } else {
            self.emit_box(index, parent, EventAction::ChildrenUpdate);
        }
    }

    /// Closes a workspace or a box. Returns the removed nodes.
    pub fn close_item(&mut self, id: &ItemId) -> Result<Vec<Node>, CanopyError> {
        match self.require(id)? {
            Located::Workspace(index) => {
                let ws = self.workspaces[index].id().clone();
                self.close_workspace(&ws)
            }
            Located::Box { workspace, .. } => {
                let parent = self.workspaces[workspace]
                    .tree()
                    .get(id)
                    .and_then(|node| node.parent.clone());
                let removed = self.workspaces[workspace].close_item(id)?;
                let ws = self.workspaces[workspace].id().clone();
                self.emit_removed(&ws, &removed);
                if let Some(parent) = parent.filter(|p| self.workspaces[workspace].contains(p)) {
                    self.emit_children_update(workspace, &parent);
                }
                Ok(removed)
            }
        }
    }

    /// Moves window `id` into `target` (a box or a workspace) of this frame.
    pub fn move_window(&mut self, id: &ItemId, target: &ItemId) -> Result<(), CanopyError> {
        let source = self.require(id)?;
        let destination = self.require(target)?;
        if !matches!(source, Located::Box { kind: NodeKind::Window, .. }) {
            return Err(CanopyError::UnsupportedOperation(format!("{id} is not a window")));
        }
        let (from, to) = (source.workspace_index(), destination.workspace_index());

        if from == to {
            let collapsed = self.workspaces[from].move_window(id, target)?;
            let ws = self.workspaces[from].id().clone();
            self.emit_removed(&ws, &collapsed);
            self.emit_box(from, id, EventAction::ContainerChange);
            return Ok(());
        }

        // Check the destination before detaching anything.
        let target_kind = match destination {
            Located::Workspace(_) => NodeKind::Workspace,
            Located::Box { kind, .. } => kind,
        };
        if self.workspaces[to].is_hibernated() {
            return Err(CanopyError::UnsupportedOperation(format!(
                "workspace {} is hibernated",
                self.workspaces[to].id()
            )));
        }
        if !target_kind.can_contain(BoxType::Window) {
            return Err(CanopyError::InvalidChildType {
                parent: target_kind.as_str().to_string(),
                child: BoxType::Window,
            });
        }
        let definition = self.take_window(id)?;
        self.add_box(target, None, &definition)?;
        Ok(())
    }

    /// Removes window `id` and returns a definition recreating it,
    /// native handle included.
    pub fn take_window(&mut self, id: &ItemId) -> Result<BoxDefinition, CanopyError> {
        let index = self.require(id)?.workspace_index();
        let definition = self.workspaces[index].take_window(id)?;
        let ws = self.workspaces[index].id().clone();
        let mut removed = Node::new(id.clone(), NodeKind::Window);
        removed.window = Some(WindowState {
            app_name: definition.app_name.clone().unwrap_or_default(),
            window_id: definition.window_id.clone(),
            ..WindowState::default()
        });
        self.emit_removed(&ws, &[removed]);
        Ok(definition)
    }

    /// Removes a window for re-opening as a standalone native window.
    /// Refused when its resolved `allowExtract` is false.
    pub fn eject(&mut self, id: &ItemId) -> Result<BoxDefinition, CanopyError> {
        let index = self.require(id)?.workspace_index();
        if !self.workspaces[index].allows(id, LockFlag::AllowExtract) {
            return Err(CanopyError::UnsupportedOperation(format!(
                "window {id} cannot be extracted"
            )));
        }
        self.take_window(id)
    }

    /// Resizes a box. Negative values are only meaningful when `relative`.
    pub fn resize_item(
        &mut self,
        id: &ItemId,
        width: Option<i32>,
        height: Option<i32>,
        relative: bool,
    ) -> Result<bool, CanopyError> {
        let index = self.require(id)?.workspace_index();
        let extent = |value: i32| {
            if relative {
                Extent::Relative(value)
            } else {
                Extent::Absolute(value.max(0).unsigned_abs())
            }
        };
        let size = self.size;
        self.workspaces[index].resize_item(size, id, width.map(extent), height.map(extent))
    }

    pub fn maximize(&mut self, id: &ItemId) -> Result<(), CanopyError> {
        let index = self.require(id)?.workspace_index();
        let previous = self.workspaces[index].maximized().cloned();
        self.workspaces[index].maximize(id)?;
        if let Some(previous) = previous.filter(|p| p != id) {
            self.emit_box(index, &previous, EventAction::Normal);
        }
        self.emit_box(index, id, EventAction::Maximized);
        Ok(())
    }

    pub fn restore(&mut self, id: &ItemId) -> Result<(), CanopyError> {
        let index = self.require(id)?.workspace_index();
        if self.workspaces[index].restore(id)? {
            self.emit_box(index, id, EventAction::Normal);
        }
        Ok(())
    }

    /// Focuses a window, selecting its workspace. Focusing a workspace
    /// selects it; focusing a container focuses its first window.
    pub fn focus(&mut self, id: &ItemId) -> Result<(), CanopyError> {
        let located = self.require(id)?;
        let index = located.workspace_index();
        let workspace = self.workspaces[index].id().clone();
        if !self.workspaces[index].is_selected() || self.workspaces[index].is_hibernated() {
            self.select_workspace(&workspace)?;
        }
        let window = match located {
            Located::Workspace(_) => return Ok(()),
            Located::Box { kind: NodeKind::Window, .. } => id.clone(),
            Located::Box { .. } => {
                let tree = self.workspaces[index].tree();
                match tree.get_all_descendants(id, Node::is_window).into_iter().next() {
                    Some(first) => first,
                    None => return Ok(()),
                }
            }
        };
        for ws in &mut self.workspaces {
            ws.clear_focus();
        }
        self.workspaces[index].focus_window(&window)?;
        self.workspaces[index].touch(monotonic_millis());
        self.emit_box(index, &window, EventAction::Focus);
        Ok(())
    }

    pub fn set_title(&mut self, id: &ItemId, title: &str) -> Result<(), CanopyError> {
        let index = self.require(id)?.workspace_index();
        self.workspaces[index].set_title(id, title)
    }

    /// Locks `id`, which must be of lock target `target`.
    pub fn lock(
        &mut self,
        id: &ItemId,
        target: LockTarget,
        request: LockRequest,
    ) -> Result<(), CanopyError> {
        let located = self.require(id)?;
        let index = located.workspace_index();
        let actual = match located {
            Located::Workspace(_) => LockTarget::Workspace,
            Located::Box { kind, .. } => kind.lock_target(),
        };
        if actual != target {
            let error = format!("{id} is a {actual}, not a {target}");
            return Err(if actual == LockTarget::Window || target == LockTarget::Window {
                CanopyError::UnsupportedOperation(error)
            } else {
                CanopyError::validation("lock", error)
            });
        }
        self.workspaces[index].lock(id, request)
    }

    pub fn bundle(&mut self, id: &WorkspaceId, kind: BoxType) -> Result<(), CanopyError> {
        let index = self.workspace_index(id)?;
        let bundle = self.workspaces[index].bundle(kind)?;
        tracing::debug!(workspace_id = %id, bundle = %bundle, "workspace bundled");
        self.emit_workspace(index, EventAction::ChildrenUpdate);
        Ok(())
    }

    /// Hibernates a workspace. Returns the removed nodes.
    pub fn hibernate(&mut self, id: &WorkspaceId) -> Result<Vec<Node>, CanopyError> {
        let index = self.workspace_index(id)?;
        let removed = self.workspaces[index].hibernate()?;
        self.emit_removed(id, &removed);
        self.emit_workspace(index, EventAction::Hibernated);
        Ok(removed)
    }

    pub fn resume(&mut self, id: &WorkspaceId) -> Result<bool, CanopyError> {
        let index = self.workspace_index(id)?;
        self.resume_at(index)
    }

    fn resume_at(&mut self, index: usize) -> Result<bool, CanopyError> {
        let applied = self.workspaces[index].resume()?;
        let root = self.workspaces[index].root_id();
        self.emit_workspace(index, EventAction::Resumed);
        self.emit_subtree_added(index, &root);
        Ok(applied)
    }

    /// Builds a persistable layout of workspace `id` and records `name` as
    /// its layout name.
    pub fn save_layout(
        &mut self,
        id: &WorkspaceId,
        name: &str,
        save_context: bool,
        metadata: Value,
    ) -> Result<WorkspaceLayout, CanopyError> {
        let index = self.workspace_index(id)?;
        let state = self.workspaces[index].to_layout_state(save_context);
        self.workspaces[index].set_layout_name(name);
        tracing::info!(workspace_id = %id, layout = name, "layout saved");
        Ok(WorkspaceLayout::new(name, state, metadata))
    }

    /// Records the native handle of a loaded window.
    pub fn mark_loaded(&mut self, id: &ItemId, window_id: &str) -> Result<(), CanopyError> {
        let index = self.require(id)?.workspace_index();
        self.workspaces[index].mark_loaded(id, window_id)?;
        self.emit_box(index, id, EventAction::Loaded);
        Ok(())
    }

    /// Unloaded windows of the selected workspace, the ones to open now.
    pub fn pending_loads(&self) -> Vec<(ItemId, WindowState)> {
        self.selected()
            .map(|ws| {
                ws.unloaded_windows()
                    .into_iter()
                    .filter_map(|node| node.window.clone().map(|w| (node.id.clone(), w)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Unloaded window `id`, wherever its workspace is.
    pub fn unloaded_window(&self, id: &ItemId) -> Result<Option<WindowState>, CanopyError> {
        let index = self.require(id)?.workspace_index();
        let node = self.workspaces[index].tree().node(id)?;
        match &node.window {
            Some(window) if window.is_loaded() => Ok(None),
            Some(window) => Ok(Some(window.clone())),
            None => Err(CanopyError::UnsupportedOperation(format!("{id} is not a window"))),
        }
    }

    pub fn emit_frame_opened(&mut self) {
        self.emit_frame(EventAction::Opened);
    }
}
