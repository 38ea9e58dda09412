//! Bottom-up aggregation of constraints over the whole tree.

use std::collections::HashMap;

use canopy_common::ItemId;
use canopy_protocol::ConstraintsConfig;

use super::types::{capped_sum, Constraints, MAX_SIZE, ROW_MIN_WIDTH};
use crate::tree::{BoxTree, NodeKind};

/// Raw aggregate of every node. Entries may be invalid (min above max)
/// when explicit constraints conflict with a subtree.
pub fn resolve_all(tree: &BoxTree) -> HashMap<ItemId, Constraints> {
    let mut resolved: HashMap<ItemId, Constraints> = HashMap::new();
    for id in tree.post_order() {
        let Some(node) = tree.get(&id) else {
            continue;
        };
        let children: Vec<Constraints> = node
            .children
            .iter()
            .filter_map(|child| resolved.get(child).copied())
            .collect();
        let in_group = node
            .parent
            .as_ref()
            .and_then(|parent| tree.get(parent))
            .is_some_and(|parent| parent.kind == NodeKind::Group);
        let aggregate = aggregate(node.kind, &children, in_group);
        resolved.insert(id, aggregate.intersect(&node.constraints));
    }
    resolved
}

fn aggregate(kind: NodeKind, children: &[Constraints], in_group: bool) -> Constraints {
    match kind {
        NodeKind::Window if in_group => Constraints::default(),
        NodeKind::Window => Constraints::default().add_header(),
        NodeKind::Group => stacked(children).add_header(),
        NodeKind::Row => {
            let split = split_horizontal(children);
            Constraints {
                min_width: split.min_width.max(ROW_MIN_WIDTH),
                ..split
            }
        }
        NodeKind::Column | NodeKind::Workspace => split_vertical(children),
    }
}

/// Children share one area: the tightest single bound wins on both axes.
fn stacked(children: &[Constraints]) -> Constraints {
    if children.is_empty() {
        return Constraints::default();
    }
    Constraints {
        min_width: children.iter().map(|c| c.min_width).max().unwrap_or_default(),
        max_width: children.iter().map(|c| c.max_width).min().unwrap_or(MAX_SIZE),
        min_height: children.iter().map(|c| c.min_height).max().unwrap_or_default(),
        max_height: children.iter().map(|c| c.max_height).min().unwrap_or(MAX_SIZE),
    }
}

/// Children side by side: widths add up, heights intersect.
fn split_horizontal(children: &[Constraints]) -> Constraints {
    if children.is_empty() {
        return Constraints::default();
    }
    Constraints {
        min_width: children.iter().fold(0, |acc, c| capped_sum(acc, c.min_width)),
        max_width: children.iter().fold(0, |acc, c| capped_sum(acc, c.max_width)),
        ..stacked(children)
    }
}

/// Children stacked top to bottom: heights add up, widths intersect.
fn split_vertical(children: &[Constraints]) -> Constraints {
    if children.is_empty() {
        return Constraints::default();
    }
    Constraints {
        min_height: children.iter().fold(0, |acc, c| capped_sum(acc, c.min_height)),
        max_height: children.iter().fold(0, |acc, c| capped_sum(acc, c.max_height)),
        ..stacked(children)
    }
}

/// Effective, reportable bounds of `id`; always satisfies min <= max.
pub fn compute_effective(tree: &BoxTree, id: &ItemId) -> Constraints {
    resolve_all(tree)
        .get(id)
        .copied()
        .unwrap_or_default()
        .clamped()
}

/// First node on the path from `id` up to the root whose bounds cross.
pub fn conflict_on_path(
    tree: &BoxTree,
    resolved: &HashMap<ItemId, Constraints>,
    id: &ItemId,
) -> Option<ItemId> {
    std::iter::once(id.clone())
        .chain(tree.ancestors(id))
        .find(|node| resolved.get(node).is_some_and(|c| !c.is_valid()))
}

/// Checks the subtree rooted at `id` (just added) against the rest of the
/// tree. On conflict every explicit constraint inside that subtree is
/// dropped and `false` is returned; the nodes themselves stay.
pub fn validate_subtree(tree: &mut BoxTree, id: &ItemId) -> bool {
    let resolved = resolve_all(tree);
    let mut scope = tree.descendants(id);
    scope.push(id.clone());

    let conflict = scope
        .iter()
        .find(|node| resolved.get(*node).is_some_and(|c| !c.is_valid()))
        .cloned()
        .or_else(|| conflict_on_path(tree, &resolved, id));
    let Some(conflict) = conflict else {
        return true;
    };

    tracing::warn!(
        item_id = %id,
        conflict_at = %conflict,
        "requested constraints conflict with the surrounding tree, ignoring them"
    );
    for node in scope {
        if let Some(node) = tree.get_mut(&node) {
            node.constraints = ConstraintsConfig::default();
        }
    }
    false
}

/// Replaces the explicit constraints of `id`, reverting if any node up to
/// the root would end up with crossing bounds.
pub fn validate_and_apply(tree: &mut BoxTree, id: &ItemId, requested: ConstraintsConfig) -> bool {
    let Some(node) = tree.get_mut(id) else {
        return false;
    };
    let previous = std::mem::replace(&mut node.constraints, requested);
    let resolved = resolve_all(tree);
    match conflict_on_path(tree, &resolved, id) {
        None => true,
        Some(conflict) => {
            tracing::warn!(item_id = %id, conflict_at = %conflict, "constraint update rejected");
            if let Some(node) = tree.get_mut(id) {
                node.constraints = previous;
            }
            false
        }
    }
}
