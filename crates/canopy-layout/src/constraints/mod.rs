//! Size constraint resolution.
//!
//! Each node's effective bounds are its children's aggregate intersected with
//! its own explicit config. Rows add widths, columns add heights, groups
//! stack; every window chain carries one tab header.

mod resolver;
mod types;

pub use resolver::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BoxTree;
    use canopy_common::{BoxType, ItemId};
    use canopy_protocol::{BoxDefinition, ConstraintsConfig, DefinitionConfig};

    fn with_constraints(def: BoxDefinition, constraints: ConstraintsConfig) -> BoxDefinition {
        def.with_config(DefinitionConfig {
            constraints,
            ..DefinitionConfig::default()
        })
    }

    fn width_bounds(min: u32, max: u32) -> ConstraintsConfig {
        ConstraintsConfig {
            min_width: Some(min),
            max_width: Some(max),
            ..ConstraintsConfig::default()
        }
    }

    #[test]
    fn empty_workspace_has_default_bounds() {
        let tree = BoxTree::new(ItemId::from("ws"));
        let c = compute_effective(&tree, tree.root());
        assert_eq!(c, Constraints::default());
        assert_eq!(c.max_width, MAX_SIZE);
    }

    #[test]
    fn window_outside_group_carries_header() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let w = tree.add_child(&root, &BoxDefinition::window("a")).unwrap();
        assert_eq!(compute_effective(&tree, &w).min_height, DEFAULT_MIN_SIZE + HEADER_HEIGHT);
    }

    #[test]
    fn grouped_windows_share_one_header() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let group = tree
            .add_child(
                &root,
                &BoxDefinition::container(
                    BoxType::Group,
                    vec![BoxDefinition::window("a"), BoxDefinition::window("b")],
                ),
            )
            .unwrap();
        let c = compute_effective(&tree, &group);
        assert_eq!(c.min_height, DEFAULT_MIN_SIZE + HEADER_HEIGHT);
        assert_eq!(c.min_width, DEFAULT_MIN_SIZE);
        let w = tree.children(&group)[0].clone();
        assert_eq!(compute_effective(&tree, &w).min_height, DEFAULT_MIN_SIZE);
    }

    #[test]
    fn empty_row_reserves_header_width() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let row = tree
            .add_child(&root, &BoxDefinition::container(BoxType::Row, vec![]))
            .unwrap();
        assert_eq!(compute_effective(&tree, &row).min_width, ROW_MIN_WIDTH);
    }

    #[test]
    fn row_sums_widths_and_intersects_heights() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let a = with_constraints(
            BoxDefinition::window("a"),
            ConstraintsConfig {
                min_width: Some(100),
                max_height: Some(400),
                ..ConstraintsConfig::default()
            },
        );
        let b = with_constraints(BoxDefinition::window("b"), width_bounds(150, 300));
        let row = tree
            .add_child(&root, &BoxDefinition::container(BoxType::Row, vec![a, b]))
            .unwrap();
        let c = compute_effective(&tree, &row);
        assert_eq!(c.min_width, 250);
        assert_eq!(c.max_width, MAX_SIZE);
        assert_eq!(c.max_height, 400);
    }

    #[test]
    fn column_with_bounds_in_mixed_row_aggregates_to_560() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let outer = tree
            .add_child(&root, &BoxDefinition::container(BoxType::Row, vec![]))
            .unwrap();
        tree.add_child(
            &outer,
            &BoxDefinition::container(
                BoxType::Column,
                vec![BoxDefinition::container(BoxType::Row, vec![])],
            ),
        )
        .unwrap();

        let column = tree
            .add_child(
                &outer,
                &with_constraints(
                    BoxDefinition::container(
                        BoxType::Column,
                        vec![BoxDefinition::window("a"), BoxDefinition::window("b")],
                    ),
                    width_bounds(500, 1000),
                ),
            )
            .unwrap();
        assert!(validate_subtree(&mut tree, &column));

        let ws = compute_effective(&tree, &root);
        assert_eq!(ws.min_width, 560);
        assert_eq!(ws.max_width, MAX_SIZE);
    }

    #[test]
    fn conflicting_container_is_kept_but_its_constraints_dropped() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let row = tree
            .add_child(
                &root,
                &BoxDefinition::container(
                    BoxType::Row,
                    vec![BoxDefinition::container(
                        BoxType::Group,
                        vec![BoxDefinition::window("a")],
                    )],
                ),
            )
            .unwrap();
        let before = compute_effective(&tree, &root);

        let column = tree
            .add_child(
                &row,
                &with_constraints(
                    BoxDefinition::container(BoxType::Column, vec![]),
                    width_bounds(1000, 900),
                ),
            )
            .unwrap();
        assert!(!validate_subtree(&mut tree, &column));

        assert!(tree.contains(&column));
        assert_eq!(tree.get(&column).unwrap().constraints, ConstraintsConfig::default());
        assert_eq!(compute_effective(&tree, &root), before);
    }

    #[test]
    fn conflict_with_ancestor_max_is_rejected() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let row = tree
            .add_child(
                &root,
                &with_constraints(
                    BoxDefinition::container(BoxType::Row, vec![]),
                    width_bounds(0, 400),
                ),
            )
            .unwrap();
        let wide = tree
            .add_child(
                &row,
                &with_constraints(BoxDefinition::window("a"), width_bounds(600, 800)),
            )
            .unwrap();
        assert!(!validate_subtree(&mut tree, &wide));
        assert!(tree.contains(&wide));
        assert!(compute_effective(&tree, &row).max_width <= 400);
    }

    #[test]
    fn validate_and_apply_reverts_on_conflict() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let w = tree.add_child(&root, &BoxDefinition::window("a")).unwrap();

        assert!(validate_and_apply(&mut tree, &w, width_bounds(100, 200)));
        assert_eq!(compute_effective(&tree, &w).max_width, 200);

        assert!(!validate_and_apply(&mut tree, &w, width_bounds(300, 250)));
        assert_eq!(tree.get(&w).unwrap().constraints, width_bounds(100, 200));
    }

    #[test]
    fn sums_are_capped_at_max_size() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let row = tree
            .add_child(
                &root,
                &BoxDefinition::container(
                    BoxType::Row,
                    vec![BoxDefinition::window("a"), BoxDefinition::window("b")],
                ),
            )
            .unwrap();
        assert_eq!(compute_effective(&tree, &row).max_width, MAX_SIZE);
    }

    #[test]
    fn effective_bounds_never_cross() {
        let mut tree = BoxTree::new(ItemId::from("ws"));
        let root = tree.root().clone();
        let row = tree
            .add_child(&root, &BoxDefinition::container(BoxType::Row, vec![]))
            .unwrap();
        for i in 0..6u32 {
            let def = with_constraints(BoxDefinition::window("w"), width_bounds(i * 150, 200 + i * 10));
            let id = tree.add_child(&row, &def).unwrap();
            validate_subtree(&mut tree, &id);
            for id in tree.descendants(&root) {
                let c = compute_effective(&tree, &id);
                assert!(c.min_width <= c.max_width && c.min_height <= c.max_height);
            }
        }
    }
}
