//! Read-only walks over the tree.

use canopy_common::ItemId;

use super::{BoxTree, Node, NodeKind};

impl BoxTree {
    /// Every node below `id` matching `predicate`, depth first in sibling
    /// order. `id` itself is not included.
    pub fn get_all_descendants<F>(&self, id: &ItemId, predicate: F) -> Vec<ItemId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut out = Vec::new();
        let mut stack: Vec<&ItemId> = self.children(id).iter().rev().collect();
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(next) {
                if predicate(node) {
                    out.push(next.clone());
                }
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    pub fn descendants(&self, id: &ItemId) -> Vec<ItemId> {
        self.get_all_descendants(id, |_| true)
    }

    /// Parent first, root last.
    pub fn ancestors(&self, id: &ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|node| node.parent.clone());
        while let Some(parent) = current {
            current = self.nodes.get(&parent).and_then(|node| node.parent.clone());
            out.push(parent);
        }
        out
    }

    /// Windows of the whole tree in visual order.
    pub fn windows(&self) -> Vec<&Node> {
        self.get_all_descendants(&self.root, Node::is_window)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    pub fn find_by_window_id(&self, window_id: &str) -> Option<&Node> {
        self.nodes.values().find(|node| {
            node.window
                .as_ref()
                .and_then(|window| window.window_id.as_deref())
                == Some(window_id)
        })
    }

    /// Closest ancestor (or `id` itself) of the given kind.
    pub fn closest(&self, id: &ItemId, kind: NodeKind) -> Option<ItemId> {
        if self.nodes.get(id)?.kind == kind {
            return Some(id.clone());
        }
        self.ancestors(id)
            .into_iter()
            .find(|ancestor| self.nodes.get(ancestor).is_some_and(|n| n.kind == kind))
    }

    /// Post-order list of every node, root last. Children are always
    /// visited before their parent.
    pub fn post_order(&self) -> Vec<ItemId> {
        let mut out = self.descendants(&self.root);
        out.insert(0, self.root.clone());
        out.reverse();
        out
    }
}
