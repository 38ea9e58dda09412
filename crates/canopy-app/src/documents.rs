//! Reading layout documents from disk.

use std::path::Path;

use canopy_common::CanopyError;
use canopy_protocol::requests::ImportLayoutRequest;
use canopy_protocol::{decode, Operation, WorkspaceLayout};
use serde_json::{json, Value};

/// One document from a file and what the decoder made of it.
#[derive(Debug)]
pub struct Checked {
    pub index: usize,
    pub name: Option<String>,
    pub result: Result<WorkspaceLayout, CanopyError>,
}

/// Raw documents in `path`: a single object, or each element of an array.
pub async fn read(path: &Path) -> Result<Vec<Value>, CanopyError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CanopyError::Config(format!("{}: {e}", path.display())))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| CanopyError::Config(format!("{}: {e}", path.display())))?;
    Ok(match value {
        Value::Array(items) => items,
        single => vec![single],
    })
}

/// Runs every document through the import decoder on its own, so one bad
/// document does not hide problems in the others.
pub fn check(documents: Vec<Value>) -> Vec<Checked> {
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            let name = document
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string);
            let result = decode::<ImportLayoutRequest>(
                Operation::ImportLayout,
                json!({ "layouts": [document] }),
            )
            .and_then(|mut request| {
                request.layouts.pop().ok_or_else(|| {
                    CanopyError::validation(Operation::ImportLayout.as_str(), "empty document")
                })
            });
            Checked {
                index,
                name,
                result,
            }
        })
        .collect()
}
