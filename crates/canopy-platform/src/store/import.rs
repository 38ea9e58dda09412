use std::path::Path;

use canopy_common::CanopyError;
use canopy_protocol::{ImportMode, WorkspaceLayout};

use super::LayoutStore;

impl LayoutStore {
    /// Merges every `*.json` layout document found directly in `dir`.
    ///
    /// A file may hold one layout or an array of them. Any unreadable or
    /// invalid file fails the whole import before the store is touched.
    pub async fn import_directory(&self, dir: &Path) -> Result<usize, CanopyError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| CanopyError::Config(format!("{}: {e}", dir.display())))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CanopyError::Config(format!("{}: {e}", dir.display())))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut layouts = Vec::new();
        for path in &paths {
            layouts.extend(read_layouts(path).await?);
        }
        tracing::info!(dir = %dir.display(), files = paths.len(), "importing layout directory");
        self.import(layouts, ImportMode::Merge).await
    }
}

async fn read_layouts(path: &Path) -> Result<Vec<WorkspaceLayout>, CanopyError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CanopyError::Config(format!("{}: {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| CanopyError::Config(format!("{}: {e}", path.display())))?;
    let parsed = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|layout| vec![layout])
    };
    parsed.map_err(|e| CanopyError::Config(format!("{}: {e}", path.display())))
}
