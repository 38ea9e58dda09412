//! Structural mutations: add, remove, close with collapse, and move.

use canopy_common::{BoxType, CanopyError, ItemId};
use canopy_protocol::BoxDefinition;

use super::{BoxTree, Node, NodeKind, WindowState};

impl BoxTree {
    /// Builds `definition` (and its nested children) under `parent`, appended
    /// after the existing children. Either the whole subtree is added or the
    /// tree is left untouched.
    pub fn add_child(
        &mut self,
        parent: &ItemId,
        definition: &BoxDefinition,
    ) -> Result<ItemId, CanopyError> {
        self.add_child_at(parent, definition, None)
    }

    pub fn add_child_at(
        &mut self,
        parent: &ItemId,
        definition: &BoxDefinition,
        index: Option<usize>,
    ) -> Result<ItemId, CanopyError> {
        let mut created = Vec::new();
        match self.insert_definition(parent, definition, index, &mut created) {
            Ok(id) => Ok(id),
            Err(err) => {
                if let Some(first) = created.first().cloned() {
                    self.detach(&first);
                }
                for id in created {
                    self.nodes.remove(&id);
                }
                Err(err)
            }
        }
    }

    fn insert_definition(
        &mut self,
        parent: &ItemId,
        definition: &BoxDefinition,
        index: Option<usize>,
        created: &mut Vec<ItemId>,
    ) -> Result<ItemId, CanopyError> {
        let parent_kind = self.node(parent)?.kind;
        let box_type = definition.resolved_type(parent_kind.box_type());
        if !parent_kind.can_contain(box_type) {
            return Err(CanopyError::InvalidChildType {
                parent: parent_kind.as_str().to_string(),
                child: box_type,
            });
        }

        let kind = NodeKind::from(box_type);
        definition
            .config
            .locks
            .check_target(kind.lock_target())
            .map_err(|reason| CanopyError::validation("addChild", reason))?;

        let mut node = Node::new(ItemId::new(), kind);
        node.constraints = definition.config.constraints;
        node.locks = definition.config.locks.clone();
        if box_type == BoxType::Window {
            let app_name = definition
                .app_name
                .clone()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    CanopyError::validation("addChild", "window definition is missing `appName`")
                })?;
            node.window = Some(WindowState {
                app_name,
                window_id: definition.window_id.clone(),
                title: definition.title.clone(),
                url: definition.url.clone(),
                context: definition.context.clone(),
                is_focused: false,
            });
        }

        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        created.push(id.clone());
        self.attach(parent, &id, index)?;

        if box_type != BoxType::Window {
            for child in &definition.children {
                self.insert_definition(&id, child, None, created)?;
            }
        }
        Ok(id)
    }

    /// Links an existing, detached node under `parent`.
    pub(crate) fn attach(
        &mut self,
        parent: &ItemId,
        id: &ItemId,
        index: Option<usize>,
    ) -> Result<(), CanopyError> {
        let parent_node = self.node_mut(parent)?;
        let at = index
            .unwrap_or(parent_node.children.len())
            .min(parent_node.children.len());
        parent_node.children.insert(at, id.clone());
        self.node_mut(id)?.parent = Some(parent.clone());
        Ok(())
    }

    /// Unlinks `id` from its parent, keeping its subtree in the arena.
    pub(crate) fn detach(&mut self, id: &ItemId) {
        let parent = self.nodes.get_mut(id).and_then(|node| node.parent.take());
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|child| child != id);
        }
    }

    /// Removes `id` and everything below it. Returns the removed nodes,
    /// top-down.
    pub fn remove_subtree(&mut self, id: &ItemId) -> Vec<Node> {
        if id == &self.root {
            return Vec::new();
        }
        self.detach(id);
        let mut removed = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children.iter().rev().cloned());
                removed.push(node);
            }
        }
        removed
    }

    /// Removes the first child of `parent` matching `predicate`, with its
    /// subtree.
    pub fn remove_child<F>(&mut self, parent: &ItemId, predicate: F) -> Vec<Node>
    where
        F: Fn(&Node) -> bool,
    {
        let target = self
            .children(parent)
            .iter()
            .find(|child| self.nodes.get(*child).is_some_and(&predicate))
            .cloned();
        match target {
            Some(target) => self.remove_subtree(&target),
            None => Vec::new(),
        }
    }

    /// Removes `id` and then every ancestor container left empty by the
    /// removal, stopping at the workspace root.
    pub fn close(&mut self, id: &ItemId) -> Result<Vec<Node>, CanopyError> {
        let parent = self.node(id)?.parent.clone();
        if id == &self.root {
            let children: Vec<ItemId> = self.root_node().children.clone();
            return Ok(children
                .iter()
                .flat_map(|child| self.remove_subtree(child))
                .collect());
        }
        let mut removed = self.remove_subtree(id);
        if let Some(parent) = parent {
            removed.extend(self.collapse_empty(&parent));
        }
        Ok(removed)
    }

    pub(crate) fn collapse_empty(&mut self, from: &ItemId) -> Vec<Node> {
        let mut removed = Vec::new();
        let mut current = Some(from.clone());
        while let Some(id) = current {
            if id == self.root {
                break;
            }
            let Some(node) = self.nodes.get(&id) else {
                break;
            };
            if !node.children.is_empty() {
                break;
            }
            current = node.parent.clone();
            removed.extend(self.remove_subtree(&id));
        }
        removed
    }

    /// Moves `id` under `new_parent` at `index` (appended when `None`).
    /// Containers emptied by the move are collapsed and returned.
    pub fn move_node(
        &mut self,
        id: &ItemId,
        new_parent: &ItemId,
        index: Option<usize>,
    ) -> Result<Vec<Node>, CanopyError> {
        let node = self.node(id)?;
        let child_type = node.kind.box_type().ok_or_else(|| {
            CanopyError::UnsupportedOperation("the workspace root cannot be moved".into())
        })?;
        let old_parent = node.parent.clone();
        let parent_kind = self.node(new_parent)?.kind;
        if !parent_kind.can_contain(child_type) {
            return Err(CanopyError::InvalidChildType {
                parent: parent_kind.as_str().to_string(),
                child: child_type,
            });
        }
        if self.ancestors(new_parent).contains(id) || new_parent == id {
            return Err(CanopyError::UnsupportedOperation(
                "cannot move a box into its own subtree".into(),
            ));
        }

        self.detach(id);
        self.attach(new_parent, id, index)?;
        if let Some(node) = self.nodes.get_mut(id) {
            node.weight = 1.0;
        }
        Ok(match old_parent {
            Some(old) if &old != new_parent => self.collapse_empty(&old),
            _ => Vec::new(),
        })
    }
}
