//! One frame's workspaces and the events their mutations produce.

mod operations;
mod types;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locking::LockRequest;
    use crate::tree::NodeKind;
    use crate::workspace::WorkspaceOptions;
    use canopy_common::{BoxType, CanopyError, EventAction, EventType, FrameId, ItemId, Size};
    use canopy_protocol::{BoxDefinition, LockConfig, LockFlag, LockTarget};
    use serde_json::json;

    fn frame() -> FrameModel {
        FrameModel::new(FrameId::from("frame-1"), Size::new(1200, 800))
    }

    fn row_with(apps: &[&str]) -> Vec<BoxDefinition> {
        vec![BoxDefinition::container(
            BoxType::Row,
            apps.iter().map(|app| BoxDefinition::window(*app)).collect(),
        )]
    }

    #[test]
    fn first_workspace_is_selected_and_titled() {
        let mut f = frame();
        let (a, _) = f.create_workspace(WorkspaceOptions::default(), &[], false).unwrap();
        let (b, _) = f.create_workspace(WorkspaceOptions::default(), &[], false).unwrap();
        assert_eq!(f.summary().selected_workspace_id, Some(a.clone()));
        assert_eq!(f.workspace(&b).unwrap().title(), "Untitled 2");
        assert_eq!(f.summary().workspace_count, 2);
    }

    #[test]
    fn creation_queues_opened_added_and_selected() {
        let mut f = frame();
        f.create_workspace(WorkspaceOptions::default(), &row_with(&["a"]), true)
            .unwrap();
        let events = f.take_events();
        let kinds: Vec<(EventType, EventAction)> =
            events.iter().map(|e| (e.event_type, e.action)).collect();
        assert_eq!(
            kinds,
            vec![
                (EventType::Workspace, EventAction::Opened),
                (EventType::Container, EventAction::Added),
                (EventType::Window, EventAction::Added),
                (EventType::Workspace, EventAction::Selected),
            ]
        );
        assert!(events.iter().all(|e| e.frame_id.as_str() == "frame-1"));
        assert_eq!(events[2].payload["config"]["appName"], "a");
        assert!(f.take_events().is_empty());
    }

    #[test]
    fn add_column_to_empty_row() {
        let mut f = frame();
        let (ws, _) = f
            .create_workspace(
                WorkspaceOptions::default(),
                &[BoxDefinition::container(BoxType::Row, vec![])],
                true,
            )
            .unwrap();
        let root = ItemId::from(&ws);
        let row = f.workspace(&ws).unwrap().tree().children(&root)[0].clone();
        let before = f.workspace(&ws).unwrap().tree().box_count();

        let outcome = f
            .add_box(
                &row,
                Some(NodeKind::Row),
                &BoxDefinition::container(BoxType::Column, vec![]),
            )
            .unwrap();
        let tree = f.workspace(&ws).unwrap().tree();
        assert_eq!(tree.get(&outcome.id).unwrap().kind, NodeKind::Column);
        assert!(tree.children(&outcome.id).is_empty());
        assert_eq!(tree.box_count(), before + 1);
    }

    #[test]
    fn add_row_to_row_is_rejected() {
        let mut f = frame();
        let (ws, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&[]), true)
            .unwrap();
        let row = f.workspace(&ws).unwrap().tree().children(&ItemId::from(&ws))[0].clone();
        let err = f
            .add_box(&row, Some(NodeKind::Row), &BoxDefinition::container(BoxType::Row, vec![]))
            .unwrap_err();
        assert!(matches!(err, CanopyError::InvalidChildType { .. }));
    }

    #[test]
    fn parent_kind_must_match() {
        let mut f = frame();
        let (ws, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&[]), true)
            .unwrap();
        let row = f.workspace(&ws).unwrap().tree().children(&ItemId::from(&ws))[0].clone();
        let err = f
            .add_box(&row, Some(NodeKind::Group), &BoxDefinition::window("x"))
            .unwrap_err();
        assert!(matches!(err, CanopyError::Validation { .. }));
        assert!(f.add_box(&ItemId::from("ghost"), None, &BoxDefinition::window("x")).unwrap_err().is_not_found());
    }

    #[test]
    fn closing_last_window_collapses_and_reports() {
        let mut f = frame();
        let (ws, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&["a"]), true)
            .unwrap();
        f.take_events();
        let window = f.workspace(&ws).unwrap().tree().windows()[0].id.clone();
        let removed = f.close_item(&window).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(f.workspace(&ws).unwrap().is_empty());
        let events = f.take_events();
        assert!(events.iter().any(|e| e.is(EventType::Window, EventAction::Removed)));
        assert!(events.iter().any(|e| e.is(EventType::Container, EventAction::Removed)));
    }

    #[test]
    fn closing_selected_workspace_selects_most_recent() {
        let mut f = frame();
        let (a, _) = f.create_workspace(WorkspaceOptions::default(), &[], true).unwrap();
        let (b, _) = f.create_workspace(WorkspaceOptions::default(), &[], true).unwrap();
        let (c, _) = f.create_workspace(WorkspaceOptions::default(), &[], true).unwrap();
        f.select_workspace(&a).unwrap();
        f.select_workspace(&c).unwrap();
        f.close_item(&ItemId::from(&c)).unwrap();
        assert_eq!(f.selected().map(|ws| ws.id().clone()), Some(a));
        assert!(f.workspace(&b).is_ok());
        assert!(f.workspace(&c).is_err());
    }

    #[test]
    fn move_window_between_workspaces_keeps_native_handle() {
        let mut f = frame();
        let mut loaded = BoxDefinition::window("chart");
        loaded.window_id = Some("native-9".into());
        let (a, _) = f
            .create_workspace(WorkspaceOptions::default(), &[loaded], true)
            .unwrap();
        let (b, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&["x"]), false)
            .unwrap();
        let window = f.workspace(&a).unwrap().tree().windows()[0].id.clone();
        let row = f.workspace(&b).unwrap().tree().children(&ItemId::from(&b))[0].clone();

        f.move_window(&window, &row).unwrap();
        assert!(f.workspace(&a).unwrap().is_empty());
        let (owner, node) = f.find_window("native-9").unwrap();
        assert_eq!(owner.id(), &b);
        assert_eq!(node.parent.as_ref(), Some(&row));
    }

    #[test]
    fn move_window_within_workspace() {
        let mut f = frame();
        let defs = vec![
            BoxDefinition::container(BoxType::Group, vec![BoxDefinition::window("a")]),
            BoxDefinition::container(BoxType::Group, vec![BoxDefinition::window("b")]),
        ];
        let (ws, _) = f.create_workspace(WorkspaceOptions::default(), &defs, true).unwrap();
        let tree = f.workspace(&ws).unwrap().tree();
        let groups = tree.children(&ItemId::from(&ws)).to_vec();
        let a = tree.children(&groups[0])[0].clone();
        f.move_window(&a, &groups[1]).unwrap();
        let tree = f.workspace(&ws).unwrap().tree();
        assert_eq!(tree.children(&groups[1]).len(), 2);
        assert!(!tree.contains(&groups[0]));
        assert!(f.move_window(&groups[1], &ItemId::from(&ws)).is_err());
    }

    #[test]
    fn focus_selects_owning_workspace() {
        let mut f = frame();
        f.create_workspace(WorkspaceOptions::default(), &row_with(&["a"]), true)
            .unwrap();
        let (b, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&["b", "c"]), false)
            .unwrap();
        let target = f.workspace(&b).unwrap().tree().windows()[1].id.clone();
        f.focus(&target).unwrap();
        assert_eq!(f.selected().map(|ws| ws.id().clone()), Some(b.clone()));
        let focused = f.workspace(&b).unwrap().tree().get(&target).unwrap();
        assert!(focused.window.as_ref().unwrap().is_focused);
    }

    #[test]
    fn lock_checks_target_type() {
        let mut f = frame();
        let defs = vec![BoxDefinition::container(
            BoxType::Group,
            vec![BoxDefinition::window("a")],
        )];
        let (ws, _) = f.create_workspace(WorkspaceOptions::default(), &defs, true).unwrap();
        let group = f.workspace(&ws).unwrap().tree().children(&ItemId::from(&ws))[0].clone();
        let window = f.workspace(&ws).unwrap().tree().children(&group)[0].clone();

        assert!(matches!(
            f.lock(&window, LockTarget::Group, LockRequest::Default),
            Err(CanopyError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            f.lock(&group, LockTarget::Row, LockRequest::Default),
            Err(CanopyError::Validation { .. })
        ));

        let config = LockConfig::new()
            .with(LockFlag::AllowDrop, false)
            .with(LockFlag::AllowDropLeft, true);
        f.lock(&group, LockTarget::Group, LockRequest::Explicit(config)).unwrap();
        let snap = f.workspace_snapshot(&ws).unwrap();
        let locks = &snap.children[0].config.locks;
        assert_eq!(locks.get(LockFlag::AllowDrop), Some(false));
        assert_eq!(locks.get(LockFlag::AllowDropLeft), Some(true));
        assert_eq!(locks.get(LockFlag::AllowDropRight), Some(false));
    }

    #[test]
    fn eject_respects_allow_extract() {
        let mut f = frame();
        let (ws, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&["a", "b"]), true)
            .unwrap();
        let windows: Vec<ItemId> = f
            .workspace(&ws)
            .unwrap()
            .tree()
            .windows()
            .iter()
            .map(|w| w.id.clone())
            .collect();
        f.lock(
            &windows[0],
            LockTarget::Window,
            LockRequest::Explicit(LockConfig::new().with(LockFlag::AllowExtract, false)),
        )
        .unwrap();
        assert!(f.eject(&windows[0]).is_err());
        let definition = f.eject(&windows[1]).unwrap();
        assert_eq!(definition.app_name.as_deref(), Some("b"));
        assert_eq!(f.workspace(&ws).unwrap().window_count(), 1);
    }

    #[test]
    fn hibernated_workspace_resumes_on_select() {
        let mut f = frame();
        let (a, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&["a"]), true)
            .unwrap();
        let (b, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&["b"]), false)
            .unwrap();
        assert!(f.hibernate(&a).is_err());
        let removed = f.hibernate(&b).unwrap();
        assert_eq!(removed.iter().filter(|n| n.is_window()).count(), 1);
        assert!(f.workspace(&b).unwrap().is_hibernated());

        f.take_events();
        f.select_workspace(&b).unwrap();
        assert!(!f.workspace(&b).unwrap().is_hibernated());
        let events = f.take_events();
        assert!(events.iter().any(|e| e.is(EventType::Workspace, EventAction::Resumed)));
        assert!(events.iter().any(|e| e.is(EventType::Window, EventAction::Added)));
    }

    #[test]
    fn saved_layout_reopens_with_same_shape() {
        let mut f = frame();
        let options = WorkspaceOptions {
            title: Some("Desk".into()),
            context: json!({"desk": 1}),
            ..WorkspaceOptions::default()
        };
        let (ws, _) = f.create_workspace(options, &row_with(&["a", "b"]), true).unwrap();
        let layout = f.save_layout(&ws, "desk", true, json!({"v": 1})).unwrap();
        assert!(layout.validate().is_ok());
        assert_eq!(f.workspace(&ws).unwrap().layout_name(), Some("desk"));

        let state = layout.state().unwrap();
        let options = WorkspaceOptions {
            title: state.config.title.clone(),
            layout_name: Some("desk".into()),
            context: state.context.clone(),
            locks: state.config.settings.locks.clone(),
        };
        let (reopened, applied) = f
            .create_workspace(options, &state.to_definitions(), false)
            .unwrap();
        assert!(applied);
        let copy = f.workspace(&reopened).unwrap();
        assert_ne!(reopened, ws);
        assert_eq!(copy.to_layout_state(true), *state);
        assert_eq!(copy.title(), "Desk");
        assert_eq!(copy.layout_name(), Some("desk"));
    }

    #[test]
    fn pending_loads_only_for_selected_workspace() {
        let mut f = frame();
        f.create_workspace(WorkspaceOptions::default(), &row_with(&["a", "b"]), true)
            .unwrap();
        let (other, _) = f
            .create_workspace(WorkspaceOptions::default(), &row_with(&["c"]), false)
            .unwrap();
        let pending = f.pending_loads();
        assert_eq!(pending.len(), 2);

        f.mark_loaded(&pending[0].0, "native-1").unwrap();
        assert_eq!(f.pending_loads().len(), 1);
        assert!(f.is_window_in_workspace("native-1"));
        let unloaded = f.workspace(&other).unwrap().tree().windows()[0].id.clone();
        assert_eq!(f.unloaded_window(&unloaded).unwrap().unwrap().app_name, "c");
        assert!(f.take_events().iter().any(|e| e.is(EventType::Window, EventAction::Loaded)));
    }

    #[test]
    fn close_all_empties_frame() {
        let mut f = frame();
        f.create_workspace(WorkspaceOptions::default(), &row_with(&["a"]), true)
            .unwrap();
        f.create_workspace(WorkspaceOptions::default(), &row_with(&["b"]), false)
            .unwrap();
        let removed = f.close_all();
        assert_eq!(removed.iter().filter(|n| n.is_window()).count(), 2);
        assert!(f.is_empty());
        let events = f.take_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| e.is(EventType::Workspace, EventAction::Closed))
                .count(),
            2
        );
        assert!(events.last().unwrap().is(EventType::Frame, EventAction::Closed));
    }

    #[test]
    fn frame_snapshot_positions_workspaces() {
        let mut f = frame();
        f.create_workspace(WorkspaceOptions::default(), &[], true).unwrap();
        f.create_workspace(WorkspaceOptions::default(), &[], false).unwrap();
        let snap = f.snapshot();
        let positions: Vec<usize> = snap
            .workspaces
            .iter()
            .map(|ws| ws.config.position_index)
            .collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(f.workspace_summaries().len(), 2);
    }
}
