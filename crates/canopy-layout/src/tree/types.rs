//! Arena storage for a workspace's box tree.

use std::collections::HashMap;

use canopy_common::{BoxType, CanopyError, ItemId, ItemKind};
use canopy_protocol::{ConstraintsConfig, LockConfig, LockTarget};
use serde_json::Value;

/// What a node is. The workspace itself is the arena root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Workspace,
    Row,
    Column,
    Group,
    Window,
}

impl NodeKind {
    pub fn box_type(&self) -> Option<BoxType> {
        match self {
            NodeKind::Workspace => None,
            NodeKind::Row => Some(BoxType::Row),
            NodeKind::Column => Some(BoxType::Column),
            NodeKind::Group => Some(BoxType::Group),
            NodeKind::Window => Some(BoxType::Window),
        }
    }

    pub fn lock_target(&self) -> LockTarget {
        match self {
            NodeKind::Workspace => LockTarget::Workspace,
            NodeKind::Row => LockTarget::Row,
            NodeKind::Column => LockTarget::Column,
            NodeKind::Group => LockTarget::Group,
            NodeKind::Window => LockTarget::Window,
        }
    }

    pub fn can_contain(&self, child: BoxType) -> bool {
        match self.box_type() {
            None => true,
            Some(parent) => parent.can_contain(child),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.box_type() {
            None => "workspace",
            Some(box_type) => box_type.as_str(),
        }
    }
}

impl From<BoxType> for NodeKind {
    fn from(box_type: BoxType) -> Self {
        match box_type {
            BoxType::Row => NodeKind::Row,
            BoxType::Column => NodeKind::Column,
            BoxType::Group => NodeKind::Group,
            BoxType::Window => NodeKind::Window,
        }
    }
}

/// Window-only state carried by leaf nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowState {
    pub app_name: String,
    /// Native window handle, present once the window has loaded.
    pub window_id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub context: Option<Value>,
    pub is_focused: bool,
}

impl WindowState {
    pub fn is_loaded(&self) -> bool {
        self.window_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: ItemId,
    pub kind: NodeKind,
    pub parent: Option<ItemId>,
    pub children: Vec<ItemId>,
    /// Explicit constraints, as requested. Effective ones are derived.
    pub constraints: ConstraintsConfig,
    /// Explicit lock flags. Missing flags inherit.
    pub locks: LockConfig,
    /// Share of the parent split's primary axis.
    pub weight: f64,
    pub window: Option<WindowState>,
}

impl Node {
    pub fn new(id: ItemId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            parent: None,
            children: Vec::new(),
            constraints: ConstraintsConfig::default(),
            locks: LockConfig::default(),
            weight: 1.0,
            window: None,
        }
    }

    pub fn is_window(&self) -> bool {
        self.kind == NodeKind::Window
    }

    pub fn item_kind(&self) -> ItemKind {
        match self.kind {
            NodeKind::Workspace => ItemKind::Workspace,
            NodeKind::Window => ItemKind::Window,
            _ => ItemKind::Container,
        }
    }
}

/// Nodes owned by id. Parent and child links are ids, never references.
#[derive(Debug, Clone)]
pub struct BoxTree {
    pub(super) nodes: HashMap<ItemId, Node>,
    pub(super) root: ItemId,
}

impl BoxTree {
    pub fn new(root: ItemId) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(root.clone(), Node::new(root.clone(), NodeKind::Workspace));
        Self { nodes, root }
    }

    pub fn root(&self) -> &ItemId {
        &self.root
    }

    pub fn root_node(&self) -> &Node {
        // The root is inserted on construction and never removed.
        &self.nodes[&self.root]
    }

    pub fn root_node_mut(&mut self) -> &mut Node {
        let root = self.root.clone();
        self.nodes.entry(root.clone()).or_insert_with(|| Node::new(root, NodeKind::Workspace))
    }

    pub fn get(&self, id: &ItemId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Like [`get`](Self::get) but a missing id is a `NotFound` error.
    pub fn node(&self, id: &ItemId) -> Result<&Node, CanopyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| CanopyError::not_found(ItemKind::Item, id.as_str()))
    }

    pub fn node_mut(&mut self, id: &ItemId) -> Result<&mut Node, CanopyError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| CanopyError::not_found(ItemKind::Item, id.as_str()))
    }

    pub fn children(&self, id: &ItemId) -> &[ItemId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Index of `id` among its siblings; 0 for the root or unknown ids.
    pub fn position_index(&self, id: &ItemId) -> usize {
        self.nodes
            .get(id)
            .and_then(|node| node.parent.as_ref())
            .and_then(|parent| self.nodes.get(parent))
            .and_then(|parent| parent.children.iter().position(|child| child == id))
            .unwrap_or(0)
    }

    /// Number of boxes below the root.
    pub fn box_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root_node().children.is_empty()
    }
}
