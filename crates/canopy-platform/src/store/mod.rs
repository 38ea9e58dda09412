//! Layout document store.
//!
//! Holds saved workspace layouts by name. Every document is validated on
//! the way in, so anything read back out can be opened.

mod import;

use std::collections::BTreeMap;
use std::sync::Arc;

use canopy_common::{CanopyError, ItemKind};
use canopy_protocol::{ImportMode, LayoutSummary, WorkspaceLayout};
use tokio::sync::RwLock;

fn invalid(operation: &str, reason: String) -> CanopyError {
    CanopyError::validation(operation, reason)
}

/// Cloneable handle to the in-memory store.
#[derive(Clone, Default)]
pub struct LayoutStore {
    layouts: Arc<RwLock<BTreeMap<String, WorkspaceLayout>>>,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Result<WorkspaceLayout, CanopyError> {
        self.layouts
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| CanopyError::not_found(ItemKind::Layout, name))
    }

    /// Every layout, ordered by name.
    pub async fn get_all(&self) -> Vec<WorkspaceLayout> {
        self.layouts.read().await.values().cloned().collect()
    }

    pub async fn summaries(&self) -> Vec<LayoutSummary> {
        self.layouts
            .read()
            .await
            .values()
            .map(WorkspaceLayout::summary)
            .collect()
    }

    /// Stores `layout`, replacing any layout of the same name.
    pub async fn save(&self, layout: WorkspaceLayout) -> Result<(), CanopyError> {
        layout.validate().map_err(|r| invalid("saveLayout", r))?;
        tracing::debug!(layout = %layout.name, "layout stored");
        self.layouts.write().await.insert(layout.name.clone(), layout);
        Ok(())
    }

    pub async fn remove(&self, name: &str) -> Result<(), CanopyError> {
        match self.layouts.write().await.remove(name) {
            Some(_) => {
                tracing::info!(layout = name, "layout deleted");
                Ok(())
            }
            None => Err(CanopyError::not_found(ItemKind::Layout, name)),
        }
    }

    /// Imports a batch. Nothing is stored unless every document is valid.
    /// `Replace` drops all existing layouts first; `Merge` overwrites only
    /// those with matching names.
    pub async fn import(
        &self,
        layouts: Vec<WorkspaceLayout>,
        mode: ImportMode,
    ) -> Result<usize, CanopyError> {
        for layout in &layouts {
            layout.validate().map_err(|r| invalid("importLayout", r))?;
        }
        let count = layouts.len();
        let mut store = self.layouts.write().await;
        if mode == ImportMode::Replace {
            store.clear();
        }
        for layout in layouts {
            store.insert(layout.name.clone(), layout);
        }
        tracing::info!(count, ?mode, "layouts imported");
        Ok(count)
    }

    pub async fn export(&self) -> Vec<WorkspaceLayout> {
        self.get_all().await
    }

    pub async fn len(&self) -> usize {
        self.layouts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.layouts.read().await.is_empty()
    }
}
