//! Recursive tree-to-size computation.

use std::collections::HashMap;

use canopy_common::{ItemId, Size};

use crate::constraints::HEADER_HEIGHT;
use crate::tree::{BoxTree, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn of(size: Size, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }
}

/// The axis along which a container of `kind` divides its area.
pub fn split_axis(kind: NodeKind) -> Option<Axis> {
    match kind {
        NodeKind::Row => Some(Axis::Horizontal),
        NodeKind::Column | NodeKind::Workspace => Some(Axis::Vertical),
        NodeKind::Group | NodeKind::Window => None,
    }
}

/// Pixel size of every node when the workspace fills `viewport`.
pub fn compute(tree: &BoxTree, viewport: Size) -> HashMap<ItemId, Size> {
    let mut out = HashMap::new();
    layout_node(tree, tree.root(), viewport, &mut out);
    out
}

fn layout_node(tree: &BoxTree, id: &ItemId, bounds: Size, out: &mut HashMap<ItemId, Size>) {
    out.insert(id.clone(), bounds);
    let Some(node) = tree.get(id) else {
        return;
    };
    if node.children.is_empty() {
        return;
    }

    match split_axis(node.kind) {
        Some(axis) => {
            let weights: Vec<f64> = node
                .children
                .iter()
                .map(|child| tree.get(child).map_or(1.0, |c| c.weight.max(0.0)))
                .collect();
            let shares = distribute(Axis::of(bounds, axis), &weights);
            for (child, share) in node.children.iter().zip(shares) {
                let child_bounds = match axis {
                    Axis::Horizontal => Size::new(share, bounds.height),
                    Axis::Vertical => Size::new(bounds.width, share),
                };
                layout_node(tree, child, child_bounds, out);
            }
        }
        None => {
            // Stacked children share the area below the tab header.
            let content = Size::new(bounds.width, bounds.height.saturating_sub(HEADER_HEIGHT));
            for child in &node.children {
                layout_node(tree, child, content, out);
            }
        }
    }
}

/// Splits `total` pixels by `weights`; the last share absorbs rounding.
pub(crate) fn distribute(total: u32, weights: &[f64]) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let sum: f64 = weights.iter().sum();
    let even = sum <= f64::EPSILON;
    let mut shares = Vec::with_capacity(weights.len());
    let mut used = 0u32;
    for (i, weight) in weights.iter().enumerate() {
        if i + 1 == weights.len() {
            shares.push(total.saturating_sub(used));
            break;
        }
        let exact = if even {
            f64::from(total) / weights.len() as f64
        } else {
            f64::from(total) * weight / sum
        };
        let share = (exact + 1e-6).floor() as u32;
        used = used.saturating_add(share);
        shares.push(share);
    }
    shares
}
