//! Resizing a box inside its split.

use canopy_common::{CanopyError, ItemId, Size};

use super::calculation::{compute, split_axis, Axis};
use crate::constraints::resolve_all;
use crate::tree::BoxTree;

/// A requested change along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Absolute(u32),
    Relative(i32),
}

/// Resizes `id` along `axis` by reweighting the nearest split that divides
/// that axis: `id` itself when its parent splits the axis, otherwise the
/// closest ancestor that sits in such a split. The new size is clamped to
/// the box's effective bounds and to what its siblings' minimums leave.
///
/// Returns `false` when nothing along the chain can change that axis.
pub fn resize_axis(
    tree: &mut BoxTree,
    viewport: Size,
    id: &ItemId,
    axis: Axis,
    extent: Extent,
) -> Result<bool, CanopyError> {
    tree.node(id)?;
    let Some(target) = std::iter::once(id.clone())
        .chain(tree.ancestors(id))
        .find(|candidate| {
            tree.get(candidate)
                .and_then(|node| node.parent.as_ref())
                .and_then(|parent| tree.get(parent))
                .is_some_and(|parent| {
                    split_axis(parent.kind) == Some(axis) && parent.children.len() > 1
                })
        })
    else {
        return Ok(false);
    };

    let Some(parent_id) = tree.get(&target).and_then(|node| node.parent.clone()) else {
        return Ok(false);
    };
    let sizes = compute(tree, viewport);
    let bounds = resolve_all(tree);
    let available = sizes.get(&parent_id).map_or(0, |s| Axis::of(*s, axis));
    let siblings: Vec<ItemId> = tree.children(&parent_id).to_vec();

    let sibling_min: u32 = siblings
        .iter()
        .filter(|s| **s != target)
        .map(|s| {
            bounds.get(s).map_or(0, |c| match axis {
                Axis::Horizontal => c.min_width,
                Axis::Vertical => c.min_height,
            })
        })
        .sum();
    let (min, max) = bounds.get(&target).map_or((0, u32::MAX), |c| match axis {
        Axis::Horizontal => (c.min_width, c.max_width),
        Axis::Vertical => (c.min_height, c.max_height),
    });

    let current = sizes.get(&target).map_or(0, |s| Axis::of(*s, axis));
    let requested = match extent {
        Extent::Absolute(value) => value,
        Extent::Relative(delta) => {
            u32::try_from((i64::from(current) + i64::from(delta)).max(0)).unwrap_or(u32::MAX)
        }
    };
    let ceiling = max.min(available.saturating_sub(sibling_min));
    let desired = requested.max(min).min(ceiling.max(min));

    let others_now: u32 = siblings
        .iter()
        .filter(|s| **s != target)
        .map(|s| sizes.get(s).map_or(0, |size| Axis::of(*size, axis)))
        .sum();
    let others_after = available.saturating_sub(desired);
    for sibling in &siblings {
        let Some(node) = tree.get_mut(sibling) else {
            continue;
        };
        if *sibling == target {
            node.weight = f64::from(desired);
        } else {
            let now = sizes.get(sibling).map_or(0, |size| Axis::of(*size, axis));
            node.weight = if others_now == 0 {
                f64::from(others_after) / (siblings.len() - 1) as f64
            } else {
                f64::from(now) * f64::from(others_after) / f64::from(others_now)
            };
        }
    }
    tracing::debug!(item_id = %target, ?axis, desired, "resized split child");
    Ok(true)
}
