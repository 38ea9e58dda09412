//! Structural mutations of a live workspace.

use canopy_common::{BoxType, CanopyError, ItemId, Size};
use canopy_protocol::{BoxDefinition, LockFlag};

use super::types::{AddOutcome, Workspace};
use crate::constraints::validate_subtree;
use crate::geometry::{resize_axis, Axis, Extent};
use crate::locking::{self, LockRequest};
use crate::tree::Node;

impl Workspace {
    fn ensure_live(&self, operation: &str) -> Result<(), CanopyError> {
        if self.is_hibernated() {
            return Err(CanopyError::UnsupportedOperation(format!(
                "{operation}: workspace {} is hibernated",
                self.id
            )));
        }
        Ok(())
    }

    /// Adds `definition` under `parent`. A constraint conflict drops the
    /// new subtree's explicit constraints but keeps its boxes.
    pub fn add_box(
        &mut self,
        parent: &ItemId,
        definition: &BoxDefinition,
    ) -> Result<AddOutcome, CanopyError> {
        self.ensure_live("addBox")?;
        let id = self.tree.add_child(parent, definition)?;
        let constraints_applied = validate_subtree(&mut self.tree, &id);
        tracing::debug!(
            workspace_id = %self.id,
            item_id = %id,
            constraints_applied,
            "box added"
        );
        Ok(AddOutcome {
            id,
            constraints_applied,
        })
    }

    /// Removes `id` and collapses containers it leaves empty. Closing the
    /// workspace root empties the workspace. Returns every removed node.
    pub fn close_item(&mut self, id: &ItemId) -> Result<Vec<Node>, CanopyError> {
        let removed = self.tree.close(id)?;
        if let Some(maximized) = &self.maximized {
            if !self.tree.contains(maximized) {
                self.maximized = None;
            }
        }
        Ok(removed)
    }

    /// Moves window `id` into `container` (a box or the workspace root),
    /// appended after its current children.
    pub fn move_window(&mut self, id: &ItemId, container: &ItemId) -> Result<Vec<Node>, CanopyError> {
        self.ensure_live("moveWindowTo")?;
        if !self.tree.node(id)?.is_window() {
            return Err(CanopyError::UnsupportedOperation(format!(
                "{id} is not a window"
            )));
        }
        self.tree.move_node(id, container, None)
    }

    /// Detaches window `id` and returns a definition that recreates it
    /// elsewhere, native handle included.
    pub fn take_window(&mut self, id: &ItemId) -> Result<BoxDefinition, CanopyError> {
        let node = self.tree.node(id)?;
        let Some(window) = node.window.as_ref() else {
            return Err(CanopyError::UnsupportedOperation(format!(
                "{id} is not a window"
            )));
        };
        let definition = BoxDefinition {
            box_type: Some(BoxType::Window),
            config: canopy_protocol::DefinitionConfig {
                constraints: node.constraints,
                locks: node.locks.clone(),
            },
            app_name: Some(window.app_name.clone()),
            window_id: window.window_id.clone(),
            title: window.title.clone(),
            url: window.url.clone(),
            context: window.context.clone(),
            ..BoxDefinition::default()
        };
        self.close_item(id)?;
        Ok(definition)
    }

    /// Resizes a box inside its split. Returns whether any axis changed.
    pub fn resize_item(
        &mut self,
        viewport: Size,
        id: &ItemId,
        width: Option<Extent>,
        height: Option<Extent>,
    ) -> Result<bool, CanopyError> {
        self.ensure_live("resizeItem")?;
        if id == self.tree.root() {
            return Err(CanopyError::UnsupportedOperation(
                "a workspace is resized with its frame".into(),
            ));
        }
        let mut changed = false;
        if let Some(extent) = width {
            changed |= resize_axis(&mut self.tree, viewport, id, Axis::Horizontal, extent)?;
        }
        if let Some(extent) = height {
            changed |= resize_axis(&mut self.tree, viewport, id, Axis::Vertical, extent)?;
        }
        Ok(changed)
    }

    /// Marks `id` as the workspace's maximized box, replacing any other.
    pub fn maximize(&mut self, id: &ItemId) -> Result<(), CanopyError> {
        self.ensure_live("maximizeItem")?;
        self.tree.node(id)?;
        if id == self.tree.root() {
            return Err(CanopyError::UnsupportedOperation(
                "a workspace cannot be maximized".into(),
            ));
        }
        self.maximized = Some(id.clone());
        Ok(())
    }

    /// Clears the maximized state of `id`. Returns `false` when it was not
    /// maximized.
    pub fn restore(&mut self, id: &ItemId) -> Result<bool, CanopyError> {
        self.tree.node(id)?;
        if self.maximized.as_ref() == Some(id) {
            self.maximized = None;
            return Ok(true);
        }
        Ok(false)
    }

    /// Focuses window `id` and unfocuses every other window.
    pub fn focus_window(&mut self, id: &ItemId) -> Result<(), CanopyError> {
        if !self.tree.node(id)?.is_window() {
            return Err(CanopyError::UnsupportedOperation(format!(
                "{id} is not a window"
            )));
        }
        self.clear_focus();
        if let Some(window) = self.tree.get_mut(id).and_then(|n| n.window.as_mut()) {
            window.is_focused = true;
        }
        Ok(())
    }

    pub(crate) fn clear_focus(&mut self) {
        let windows: Vec<ItemId> = self.tree.windows().iter().map(|w| w.id.clone()).collect();
        for id in windows {
            if let Some(window) = self.tree.get_mut(&id).and_then(|n| n.window.as_mut()) {
                window.is_focused = false;
            }
        }
    }

    /// Renames the workspace or one of its windows. Containers have no title.
    pub fn set_title(&mut self, id: &ItemId, title: &str) -> Result<(), CanopyError> {
        if id == self.tree.root() {
            self.title = title.to_string();
            return Ok(());
        }
        let node = self.tree.node_mut(id)?;
        match node.window.as_mut() {
            Some(window) => {
                window.title = Some(title.to_string());
                Ok(())
            }
            None => Err(CanopyError::UnsupportedOperation(format!(
                "a {} has no title",
                node.kind.as_str()
            ))),
        }
    }

    /// Records the native handle of window `id` once it has loaded.
    pub fn mark_loaded(&mut self, id: &ItemId, window_id: &str) -> Result<(), CanopyError> {
        let node = self.tree.node_mut(id)?;
        match node.window.as_mut() {
            Some(window) => {
                window.window_id = Some(window_id.to_string());
                Ok(())
            }
            None => Err(CanopyError::UnsupportedOperation(format!(
                "{id} is not a window"
            ))),
        }
    }

    /// Windows still waiting for a native window.
    pub fn unloaded_windows(&self) -> Vec<&Node> {
        self.tree
            .windows()
            .into_iter()
            .filter(|node| node.window.as_ref().is_some_and(|w| !w.is_loaded()))
            .collect()
    }

    /// Replaces the explicit locks of `id` (the workspace root or a box).
    pub fn lock(&mut self, id: &ItemId, request: LockRequest) -> Result<(), CanopyError> {
        locking::lock(&mut self.tree, id, request)
    }

    /// Whether `flag` resolves to unlocked on `id`.
    pub fn allows(&self, id: &ItemId, flag: LockFlag) -> bool {
        locking::resolve(&self.tree, id, flag)
    }

    /// Rebuilds the tree as one row or column holding every window in its
    /// own group, in visual order. Window ids and state are kept.
    pub fn bundle(&mut self, kind: BoxType) -> Result<ItemId, CanopyError> {
        self.ensure_live("bundleWorkspace")?;
        if !matches!(kind, BoxType::Row | BoxType::Column) {
            return Err(CanopyError::UnsupportedOperation(format!(
                "cannot bundle into a {kind}"
            )));
        }
        let root = self.root_id();
        let windows: Vec<ItemId> = self.tree.windows().iter().map(|w| w.id.clone()).collect();
        let bundle = self
            .tree
            .add_child_at(&root, &BoxDefinition::container(kind, Vec::new()), Some(0))?;

        for window in &windows {
            let group = self
                .tree
                .add_child(&bundle, &BoxDefinition::container(BoxType::Group, Vec::new()))?;
            self.tree.move_node(window, &group, None)?;
        }

        let leftovers: Vec<ItemId> = self
            .tree
            .children(&root)
            .iter()
            .filter(|child| **child != bundle)
            .cloned()
            .collect();
        for leftover in leftovers {
            self.tree.remove_subtree(&leftover);
        }
        if self.tree.children(&bundle).is_empty() {
            self.tree.remove_subtree(&bundle);
        } else {
            validate_subtree(&mut self.tree, &bundle);
        }
        if let Some(maximized) = &self.maximized {
            if !self.tree.contains(maximized) {
                self.maximized = None;
            }
        }
        Ok(bundle)
    }
}
