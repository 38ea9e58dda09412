mod operations;
mod traversal;
mod types;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_common::{BoxType, CanopyError, ItemId};
    use canopy_protocol::BoxDefinition;

    const ALL: [BoxType; 4] = [BoxType::Row, BoxType::Column, BoxType::Group, BoxType::Window];

    fn tree() -> BoxTree {
        BoxTree::new(ItemId::from("ws"))
    }

    fn def(box_type: BoxType) -> BoxDefinition {
        match box_type {
            BoxType::Window => BoxDefinition::window("notes"),
            other => BoxDefinition::container(other, vec![]),
        }
    }

    #[test]
    fn type_matrix_is_enforced_for_every_pair() {
        for parent_type in ALL.into_iter().filter(BoxType::is_container) {
            for child_type in ALL {
                let mut t = tree();
                let root = t.root().clone();
                let parent = t.add_child(&root, &def(parent_type)).unwrap();
                // Give the parent an existing child so positionIndex is non-trivial.
                let seed = if parent_type == BoxType::Group {
                    BoxType::Window
                } else {
                    BoxType::Group
                };
                t.add_child(&parent, &def(seed)).unwrap();
                let before = t.children(&parent).len();

                let result = t.add_child(&parent, &def(child_type));
                if parent_type.can_contain(child_type) {
                    let id = result.unwrap();
                    assert_eq!(t.position_index(&id), before, "{parent_type} <- {child_type}");
                } else {
                    assert!(
                        matches!(result, Err(CanopyError::InvalidChildType { .. })),
                        "{parent_type} <- {child_type} should be rejected"
                    );
                    assert_eq!(t.children(&parent).len(), before);
                }
            }
        }
    }

    #[test]
    fn workspace_root_accepts_every_type() {
        for child_type in ALL {
            let mut t = tree();
            let root = t.root().clone();
            assert!(t.add_child(&root, &def(child_type)).is_ok());
        }
    }

    #[test]
    fn nothing_can_be_added_to_a_window() {
        let mut t = tree();
        let root = t.root().clone();
        let window = t.add_child(&root, &def(BoxType::Window)).unwrap();
        let err = t.add_child(&window, &def(BoxType::Window)).unwrap_err();
        assert!(matches!(err, CanopyError::InvalidChildType { ref parent, .. } if parent == "window"));
    }

    #[test]
    fn nested_definition_is_built_in_order() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t
            .add_child(
                &root,
                &BoxDefinition::container(
                    BoxType::Row,
                    vec![
                        BoxDefinition::window("a"),
                        BoxDefinition::container(BoxType::Group, vec![BoxDefinition::window("b")]),
                    ],
                ),
            )
            .unwrap();
        assert_eq!(t.box_count(), 4);
        let apps: Vec<_> = t
            .windows()
            .iter()
            .map(|w| w.window.as_ref().unwrap().app_name.clone())
            .collect();
        assert_eq!(apps, vec!["a", "b"]);
        assert_eq!(t.descendants(&row).len(), 3);
    }

    #[test]
    fn failed_nested_add_leaves_tree_untouched() {
        let mut t = tree();
        let root = t.root().clone();
        let bad = BoxDefinition::container(
            BoxType::Row,
            vec![
                BoxDefinition::window("a"),
                BoxDefinition::container(BoxType::Row, vec![]),
            ],
        );
        assert!(t.add_child(&root, &bad).is_err());
        assert_eq!(t.box_count(), 0);
        assert!(t.is_empty());
    }

    #[test]
    fn window_without_app_name_is_rejected() {
        let mut t = tree();
        let root = t.root().clone();
        let bare = BoxDefinition {
            box_type: Some(BoxType::Window),
            ..BoxDefinition::default()
        };
        assert!(matches!(
            t.add_child(&root, &bare),
            Err(CanopyError::Validation { .. })
        ));
    }

    #[test]
    fn close_collapses_empty_containers() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t.add_child(&root, &def(BoxType::Row)).unwrap();
        let column = t.add_child(&row, &def(BoxType::Column)).unwrap();
        let group = t.add_child(&column, &def(BoxType::Group)).unwrap();
        let window = t.add_child(&group, &def(BoxType::Window)).unwrap();

        let removed = t.close(&window).unwrap();
        assert_eq!(removed.len(), 4);
        assert!(t.is_empty());
        assert!(t.get(&row).is_none());
    }

    #[test]
    fn close_stops_at_non_empty_ancestor() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t.add_child(&root, &def(BoxType::Row)).unwrap();
        let a = t.add_child(&row, &def(BoxType::Window)).unwrap();
        let b = t.add_child(&row, &def(BoxType::Window)).unwrap();

        t.close(&a).unwrap();
        assert!(t.contains(&row));
        assert_eq!(t.position_index(&b), 0);
    }

    #[test]
    fn closing_the_sole_root_child_empties_the_workspace() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t.add_child(&root, &def(BoxType::Row)).unwrap();
        t.close(&row).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.box_count(), 0);
    }

    #[test]
    fn remove_child_by_predicate() {
        let mut t = tree();
        let root = t.root().clone();
        t.add_child(&root, &def(BoxType::Row)).unwrap();
        let group = t.add_child(&root, &def(BoxType::Group)).unwrap();
        let removed = t.remove_child(&root, |node| node.kind == NodeKind::Row);
        assert_eq!(removed.len(), 1);
        assert_eq!(t.position_index(&group), 0);
    }

    #[test]
    fn move_node_respects_matrix_and_collapses_source() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t.add_child(&root, &def(BoxType::Row)).unwrap();
        let g1 = t.add_child(&row, &def(BoxType::Group)).unwrap();
        let w = t.add_child(&g1, &def(BoxType::Window)).unwrap();
        let g2 = t.add_child(&row, &def(BoxType::Group)).unwrap();

        let collapsed = t.move_node(&w, &g2, None).unwrap();
        assert_eq!(collapsed.len(), 1);
        assert!(t.get(&g1).is_none());
        assert_eq!(t.get(&w).unwrap().parent.as_ref(), Some(&g2));

        assert!(matches!(
            t.move_node(&g2, &g2, None),
            Err(CanopyError::InvalidChildType { .. })
        ));
    }

    #[test]
    fn cannot_move_into_own_subtree() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t.add_child(&root, &def(BoxType::Row)).unwrap();
        let column = t.add_child(&row, &def(BoxType::Column)).unwrap();
        let err = t.move_node(&row, &column, None).unwrap_err();
        assert!(matches!(err, CanopyError::UnsupportedOperation(_)));
    }

    #[test]
    fn descendants_filter_and_ancestors() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t.add_child(&root, &def(BoxType::Row)).unwrap();
        let group = t.add_child(&row, &def(BoxType::Group)).unwrap();
        let window = t.add_child(&group, &def(BoxType::Window)).unwrap();

        assert_eq!(t.get_all_descendants(&root, Node::is_window), vec![window.clone()]);
        assert_eq!(t.ancestors(&window), vec![group.clone(), row, root]);
        assert_eq!(t.closest(&window, NodeKind::Group), Some(group));
    }

    #[test]
    fn find_by_native_window_id() {
        let mut t = tree();
        let root = t.root().clone();
        let mut loaded = BoxDefinition::window("chart");
        loaded.window_id = Some("native-7".into());
        let id = t.add_child(&root, &loaded).unwrap();
        assert_eq!(t.find_by_window_id("native-7").unwrap().id, id);
        assert!(t.find_by_window_id("native-8").is_none());
    }

    #[test]
    fn post_order_visits_children_first() {
        let mut t = tree();
        let root = t.root().clone();
        let row = t.add_child(&root, &def(BoxType::Row)).unwrap();
        let w = t.add_child(&row, &def(BoxType::Window)).unwrap();
        let order = t.post_order();
        let pos = |id: &ItemId| order.iter().position(|x| x == id).unwrap();
        assert!(pos(&w) < pos(&row));
        assert!(pos(&row) < pos(&root));
    }
}
