mod calculation;
mod resize;

pub use calculation::*;
pub use resize::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BoxTree;
    use canopy_common::{BoxType, ItemId, Size};
    use canopy_protocol::BoxDefinition;

    fn row_of(n: usize) -> (BoxTree, ItemId, Vec<ItemId>) {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let children = (0..n).map(|_| BoxDefinition::window("w")).collect();
        let row = tree
            .add_child(&root, &BoxDefinition::container(BoxType::Row, children))
            .unwrap();
        let ids = tree.children(&row).to_vec();
        (tree, row, ids)
    }

    #[test]
    fn single_window_fills_viewport() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let w = tree.add_child(&root, &BoxDefinition::window("a")).unwrap();
        let sizes = compute(&tree, Size::new(800, 600));
        assert_eq!(sizes[&w], Size::new(800, 600));
    }

    #[test]
    fn row_divides_width_evenly() {
        let (tree, _, ids) = row_of(3);
        let sizes = compute(&tree, Size::new(900, 600));
        for id in &ids {
            assert_eq!(sizes[id], Size::new(300, 600));
        }
    }

    #[test]
    fn rounding_goes_to_last_child() {
        let (tree, _, ids) = row_of(3);
        let sizes = compute(&tree, Size::new(1000, 600));
        let total: u32 = ids.iter().map(|id| sizes[id].width).sum();
        assert_eq!(total, 1000);
        assert_eq!(sizes[&ids[2]].width, 334);
    }

    #[test]
    fn group_children_lose_header_height() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let g = tree
            .add_child(
                &root,
                &BoxDefinition::container(BoxType::Group, vec![BoxDefinition::window("a")]),
            )
            .unwrap();
        let w = tree.children(&g)[0].clone();
        let sizes = compute(&tree, Size::new(800, 600));
        assert_eq!(sizes[&w], Size::new(800, 570));
    }

    #[test]
    fn absolute_resize_reweights_siblings() {
        let (mut tree, _, ids) = row_of(2);
        let viewport = Size::new(1000, 600);
        assert!(resize_axis(&mut tree, viewport, &ids[0], Axis::Horizontal, Extent::Absolute(700)).unwrap());
        let sizes = compute(&tree, viewport);
        assert_eq!(sizes[&ids[0]].width, 700);
        assert_eq!(sizes[&ids[1]].width, 300);
    }

    #[test]
    fn relative_resize_is_clamped_by_sibling_minimums() {
        let (mut tree, _, ids) = row_of(2);
        let viewport = Size::new(1000, 600);
        resize_axis(&mut tree, viewport, &ids[0], Axis::Horizontal, Extent::Relative(10_000)).unwrap();
        let sizes = compute(&tree, viewport);
        assert_eq!(sizes[&ids[1]].width, 20);
        assert_eq!(sizes[&ids[0]].width, 980);
    }

    #[test]
    fn huge_relative_growth_saturates_instead_of_wrapping() {
        let (mut tree, _, ids) = row_of(2);
        let viewport = Size::new(u32::MAX, 600);
        resize_axis(&mut tree, viewport, &ids[0], Axis::Horizontal, Extent::Absolute(4_000_000_000)).unwrap();
        resize_axis(&mut tree, viewport, &ids[0], Axis::Horizontal, Extent::Relative(i32::MAX)).unwrap();
        let sizes = compute(&tree, viewport);
        assert!(sizes[&ids[0]].width > 4_000_000_000);
        assert!(sizes[&ids[1]].width >= 20);
    }

    #[test]
    fn cross_axis_resize_climbs_to_enclosing_split() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let column = tree
            .add_child(
                &root,
                &BoxDefinition::container(
                    BoxType::Column,
                    vec![
                        BoxDefinition::container(
                            BoxType::Row,
                            vec![BoxDefinition::window("a"), BoxDefinition::window("b")],
                        ),
                        BoxDefinition::window("c"),
                    ],
                ),
            )
            .unwrap();
        let row = tree.children(&column)[0].clone();
        let a = tree.children(&row)[0].clone();
        let viewport = Size::new(1000, 1000);

        assert!(resize_axis(&mut tree, viewport, &a, Axis::Vertical, Extent::Absolute(800)).unwrap());
        let sizes = compute(&tree, viewport);
        assert_eq!(sizes[&row].height, 800);
        assert_eq!(sizes[&a].height, 800);
    }

    #[test]
    fn lone_child_cannot_resize() {
        let (mut tree, _, ids) = row_of(1);
        let resized =
            resize_axis(&mut tree, Size::new(800, 600), &ids[0], Axis::Horizontal, Extent::Absolute(100))
                .unwrap();
        assert!(!resized);
    }

    #[test]
    fn distribute_handles_zero_weights() {
        assert_eq!(distribute(90, &[0.0, 0.0, 0.0]), vec![30, 30, 30]);
        assert!(distribute(90, &[]).is_empty());
    }
}
