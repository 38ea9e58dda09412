//! The workspace record and its constructors.

use canopy_common::{CanopyError, ItemId, WorkspaceId};
use canopy_protocol::{BoxDefinition, LockConfig, LockTarget, WorkspaceLayoutState};
use serde_json::Value;

use crate::tree::BoxTree;

/// Creation-time settings of a workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceOptions {
    pub title: Option<String>,
    pub layout_name: Option<String>,
    pub context: Value,
    /// Explicit workspace lock flags. Missing flags default to unlocked.
    pub locks: LockConfig,
}

/// Result of adding a box: its id and whether its requested constraints
/// survived validation against the rest of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub id: ItemId,
    pub constraints_applied: bool,
}

/// One workspace: a title, selection and hibernation state, and an arena
/// tree rooted at a node whose id equals the workspace id.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub(super) id: WorkspaceId,
    pub(super) title: String,
    pub(super) layout_name: Option<String>,
    pub(super) context: Value,
    pub(super) tree: BoxTree,
    pub(super) is_selected: bool,
    pub(super) last_active: i64,
    /// Layout kept while hibernated; `Some` exactly when hibernated.
    pub(super) retained: Option<WorkspaceLayoutState>,
    /// The single maximized box, if any.
    pub(super) maximized: Option<ItemId>,
}

impl Workspace {
    /// An empty workspace. `title` falls back to `fallback_title` when the
    /// options carry none.
    pub fn new(options: WorkspaceOptions, fallback_title: &str) -> Result<Self, CanopyError> {
        options
            .locks
            .check_target(LockTarget::Workspace)
            .map_err(|reason| CanopyError::validation("createWorkspace", reason))?;

        let id = WorkspaceId::new();
        let mut tree = BoxTree::new(ItemId::from(&id));
        tree.root_node_mut().locks = options.locks;

        Ok(Self {
            id,
            title: options
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| fallback_title.to_string()),
            layout_name: options.layout_name,
            context: options.context,
            tree,
            is_selected: false,
            last_active: 0,
            retained: None,
            maximized: None,
        })
    }

    /// A workspace populated from `definitions`, in order. Fails without a
    /// partial result if any definition is rejected. The flag reports
    /// whether every requested constraint set was applied.
    pub fn build(
        options: WorkspaceOptions,
        fallback_title: &str,
        definitions: &[BoxDefinition],
    ) -> Result<(Self, bool), CanopyError> {
        let mut workspace = Self::new(options, fallback_title)?;
        let root = workspace.root_id();
        let mut all_applied = true;
        for definition in definitions {
            all_applied &= workspace.add_box(&root, definition)?.constraints_applied;
        }
        Ok((workspace, all_applied))
    }

    // -- Accessors --

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    /// Id of the tree root, which is the workspace id as an item id.
    pub fn root_id(&self) -> ItemId {
        self.tree.root().clone()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layout_name(&self) -> Option<&str> {
        self.layout_name.as_deref()
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn set_context(&mut self, context: Value) {
        self.context = context;
    }

    pub fn tree(&self) -> &BoxTree {
        &self.tree
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn last_active(&self) -> i64 {
        self.last_active
    }

    pub fn is_hibernated(&self) -> bool {
        self.retained.is_some()
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    /// Stamps `lastActive`.
    pub(crate) fn touch(&mut self, at: i64) {
        self.last_active = at;
    }

    pub(crate) fn set_layout_name(&mut self, name: &str) {
        self.layout_name = Some(name.to_string());
    }

    pub fn maximized(&self) -> Option<&ItemId> {
        self.maximized.as_ref()
    }

    /// Whether `id` is the workspace itself or a box inside it.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.tree.contains(id)
    }

    /// Windows currently in the tree, or those retained while hibernated.
    pub fn window_count(&self) -> usize {
        match &self.retained {
            Some(state) => state
                .to_definitions()
                .iter()
                .map(BoxDefinition::window_count)
                .sum(),
            None => self.tree.windows().len(),
        }
    }

    /// Empty means nothing to show and nothing to hibernate.
    pub fn is_empty(&self) -> bool {
        self.retained.is_none() && self.tree.is_empty()
    }
}
