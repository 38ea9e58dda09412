//! Layout export, hibernation and resume.
//!
//! Only explicit configuration leaves the tree. Native handles, focus,
//! maximize state and positions are runtime facts and are regenerated when
//! the layout is rebuilt.

use canopy_common::{BoxType, CanopyError, ItemId};
use canopy_protocol::{
    DefinitionConfig, LayoutNode, LayoutNodeConfig, WorkspaceLayoutConfig,
    WorkspaceLayoutState,
};
use serde_json::Value;

use super::types::Workspace;
use crate::tree::{BoxTree, Node};

fn layout_node(tree: &BoxTree, id: &ItemId, save_context: bool) -> Option<LayoutNode> {
    let node = tree.get(id)?;
    let box_type = node.kind.box_type()?;
    let settings = DefinitionConfig {
        constraints: node.constraints,
        locks: node.locks.clone(),
    };
    let config = match &node.window {
        Some(window) => LayoutNodeConfig {
            app_name: Some(window.app_name.clone()),
            url: window.url.clone(),
            title: window.title.clone(),
            context: window.context.clone().filter(|_| save_context),
            settings,
        },
        None => LayoutNodeConfig {
            settings,
            ..LayoutNodeConfig::default()
        },
    };
    let children = if box_type == BoxType::Window {
        Vec::new()
    } else {
        node.children
            .iter()
            .filter_map(|child| layout_node(tree, child, save_context))
            .collect()
    };
    Some(LayoutNode {
        box_type,
        config,
        children,
    })
}

impl Workspace {
    /// The workspace as a persistable layout state. A hibernated workspace
    /// reports the state it retained.
    pub fn to_layout_state(&self, save_context: bool) -> WorkspaceLayoutState {
        if let Some(retained) = &self.retained {
            let mut state = retained.clone();
            state.config.title = Some(self.title.clone());
            if !save_context {
                state.context = Value::Null;
            }
            return state;
        }
        let root = self.tree.root_node();
        WorkspaceLayoutState {
            children: root
                .children
                .iter()
                .filter_map(|child| layout_node(&self.tree, child, save_context))
                .collect(),
            config: WorkspaceLayoutConfig {
                title: Some(self.title.clone()),
                settings: DefinitionConfig {
                    locks: root.locks.clone(),
                    ..DefinitionConfig::default()
                },
            },
            context: if save_context {
                self.context.clone()
            } else {
                Value::Null
            },
        }
    }

    /// Tears the tree down and keeps its layout for [`resume`](Self::resume).
    /// Refused for the selected workspace, a hibernated one, or an empty one.
    /// Returns the removed nodes so their native windows can be closed.
    pub fn hibernate(&mut self) -> Result<Vec<Node>, CanopyError> {
        let refusal = if self.is_selected {
            Some("it is selected")
        } else if self.is_hibernated() {
            Some("it is already hibernated")
        } else if self.tree.is_empty() {
            Some("it is empty")
        } else {
            None
        };
        if let Some(reason) = refusal {
            tracing::warn!(workspace_id = %self.id, reason, "hibernation refused");
            return Err(CanopyError::UnsupportedOperation(format!(
                "cannot hibernate workspace {}: {reason}",
                self.id
            )));
        }

        let state = self.to_layout_state(true);
        let root = self.root_id();
        let removed = self.tree.close(&root)?;
        self.maximized = None;
        self.retained = Some(state);
        tracing::info!(
            workspace_id = %self.id,
            windows = removed.iter().filter(|n| n.is_window()).count(),
            "workspace hibernated"
        );
        Ok(removed)
    }

    /// Rebuilds the tree from the retained layout. Windows come back
    /// unloaded. Returns whether every constraint set was applied.
    pub fn resume(&mut self) -> Result<bool, CanopyError> {
        let Some(state) = self.retained.take() else {
            return Err(CanopyError::UnsupportedOperation(format!(
                "workspace {} is not hibernated",
                self.id
            )));
        };
        let root = self.root_id();
        let mut all_applied = true;
        for definition in state.to_definitions() {
            match self.add_box(&root, &definition) {
                Ok(outcome) => all_applied &= outcome.constraints_applied,
                Err(err) => {
                    // Put the workspace back the way it was.
                    self.tree.close(&root)?;
                    self.retained = Some(state);
                    return Err(err);
                }
            }
        }
        tracing::info!(workspace_id = %self.id, "workspace resumed");
        Ok(all_applied)
    }
}
