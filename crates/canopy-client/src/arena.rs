//! Snapshot arena.
//!
//! A workspace snapshot is flattened into a vector of entries. Parents and
//! children are indices into that vector, so every back-reference is a
//! lookup and the whole graph is dropped at once when a facade refreshes.

use std::collections::HashMap;

use canopy_common::{BoxType, FrameId, ItemId, WorkspaceId};
use canopy_protocol::{BoxSnapshot, BoxSnapshotConfig, FrameSummary, WorkspaceSnapshot, WorkspaceSummaryConfig};
use serde_json::Value;

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub id: ItemId,
    pub box_type: BoxType,
    pub config: BoxSnapshotConfig,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// One workspace as last seen, frozen until the next refresh.
#[derive(Debug, Clone)]
pub struct WorkspaceTree {
    pub(crate) id: WorkspaceId,
    pub(crate) config: WorkspaceSummaryConfig,
    pub(crate) frame: FrameSummary,
    pub(crate) context: Value,
    pub(crate) roots: Vec<usize>,
    pub(crate) entries: Vec<Entry>,
    index: HashMap<ItemId, usize>,
}

impl WorkspaceTree {
    pub fn from_snapshot(snapshot: WorkspaceSnapshot) -> Self {
        let mut tree = Self {
            id: snapshot.id,
            config: snapshot.config,
            frame: snapshot.frame_summary,
            context: snapshot.context,
            roots: Vec::new(),
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for child in snapshot.children {
            let index = tree.push(child, None);
            tree.roots.push(index);
        }
        tree
    }

    fn push(&mut self, snapshot: BoxSnapshot, parent: Option<usize>) -> usize {
        let index = self.entries.len();
        self.index.insert(snapshot.id.clone(), index);
        self.entries.push(Entry {
            id: snapshot.id,
            box_type: snapshot.box_type,
            config: snapshot.config,
            parent,
            children: Vec::new(),
        });
        for child in snapshot.children {
            let child_index = self.push(child, Some(index));
            self.entries[index].children.push(child_index);
        }
        index
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn frame_id(&self) -> &FrameId {
        &self.config.frame_id
    }

    pub(crate) fn lookup(&self, id: &ItemId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn entry(&self, index: usize) -> &Entry {
        &self.entries[index]
    }

    /// Number of boxes below the workspace root.
    pub fn box_count(&self) -> usize {
        self.entries.len()
    }

    /// Indices in depth-first tree order. Entries are pushed pre-order, so
    /// this is just the vector order.
    pub(crate) fn depth_first(&self) -> impl Iterator<Item = usize> {
        0..self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_protocol::LockConfig;

    fn config() -> BoxSnapshotConfig {
        BoxSnapshotConfig {
            frame_id: FrameId::from("frame-1"),
            workspace_id: WorkspaceId::from("ws-1"),
            position_index: 0,
            min_width: 0,
            max_width: 32767,
            min_height: 0,
            max_height: 32767,
            width: 0,
            height: 0,
            is_maximized: false,
            locks: LockConfig::new(),
            app_name: None,
            window_id: None,
            title: None,
            url: None,
            context: None,
            is_loaded: None,
            is_focused: None,
        }
    }

    fn node(id: &str, box_type: BoxType, children: Vec<BoxSnapshot>) -> BoxSnapshot {
        BoxSnapshot {
            id: ItemId::from(id),
            box_type,
            config: config(),
            children,
        }
    }

    fn snapshot(children: Vec<BoxSnapshot>) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            id: WorkspaceId::from("ws-1"),
            config: WorkspaceSummaryConfig {
                frame_id: FrameId::from("frame-1"),
                title: "Untitled 1".into(),
                position_index: 0,
                layout_name: None,
                is_selected: true,
                is_hibernated: false,
                last_active: 1,
                window_count: 0,
                min_width: 0,
                max_width: 32767,
                min_height: 0,
                max_height: 32767,
                locks: LockConfig::new(),
            },
            children,
            frame_summary: FrameSummary {
                id: FrameId::from("frame-1"),
                workspace_count: 1,
                selected_workspace_id: None,
            },
            context: Value::Null,
        }
    }

    #[test]
    fn parents_resolve_by_index() {
        let tree = WorkspaceTree::from_snapshot(snapshot(vec![node(
            "row",
            BoxType::Row,
            vec![
                node("col", BoxType::Column, vec![node("w-1", BoxType::Window, vec![])]),
                node("w-2", BoxType::Window, vec![]),
            ],
        )]));

        assert_eq!(tree.box_count(), 4);
        let window = tree.lookup(&ItemId::from("w-1")).unwrap();
        let column = tree.entry(window).parent.unwrap();
        assert_eq!(tree.entry(column).id.as_str(), "col");
        let row = tree.entry(column).parent.unwrap();
        assert_eq!(tree.entry(row).parent, None);
        assert_eq!(tree.roots, vec![row]);
        assert_eq!(tree.entry(row).children.len(), 2);
    }

    #[test]
    fn depth_first_is_pre_order() {
        let tree = WorkspaceTree::from_snapshot(snapshot(vec![
            node("g", BoxType::Group, vec![node("a", BoxType::Window, vec![])]),
            node("b", BoxType::Window, vec![]),
        ]));
        let ids: Vec<&str> = tree
            .depth_first()
            .map(|i| tree.entry(i).id.as_str())
            .collect();
        assert_eq!(ids, vec!["g", "a", "b"]);
    }
}
