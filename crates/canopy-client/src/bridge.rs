use std::sync::Arc;

use canopy_common::{CanopyError, Event, ItemId, Result, WorkspaceId};
use canopy_platform::PlatformHandle;
use canopy_protocol::decode::encode;
use canopy_protocol::requests::ItemRequest;
use canopy_protocol::{decode, Operation, WireMessage, WorkspaceSnapshot};
use tokio::sync::broadcast;

use crate::arena::WorkspaceTree;

/// Typed access to the platform for facades.
///
/// Requests are checked before they leave and results are decoded when they
/// come back, so a facade never sees a payload its operation does not
/// define.
#[derive(Clone)]
pub struct Bridge {
    handle: PlatformHandle,
}

impl Bridge {
    pub fn new(handle: PlatformHandle) -> Self {
        Self { handle }
    }

    pub async fn send<Q, R>(&self, operation: Operation, request: &Q) -> Result<R>
    where
        Q: WireMessage,
        R: WireMessage,
    {
        request.check(operation)?;
        let payload = encode(operation, request)?;
        tracing::trace!(operation = %operation, "client request");
        let value = self.handle.call(operation.as_str(), payload).await?;
        decode(operation, value)
    }

    /// Fetches a fresh snapshot of `workspace` and flattens it.
    pub async fn workspace_tree(&self, workspace: &WorkspaceId) -> Result<Arc<WorkspaceTree>> {
        let snapshot: WorkspaceSnapshot = self
            .send(Operation::GetWorkspaceSnapshot, &ItemRequest::new(workspace))
            .await?;
        if &snapshot.id != workspace {
            return Err(CanopyError::validation(
                Operation::GetWorkspaceSnapshot.as_str(),
                format!("asked for workspace {workspace}, got {}", snapshot.id),
            ));
        }
        Ok(Arc::new(WorkspaceTree::from_snapshot(snapshot)))
    }

    /// Snapshot of the workspace holding `item`.
    pub async fn tree_of(&self, item: &ItemId) -> Result<Arc<WorkspaceTree>> {
        let snapshot: WorkspaceSnapshot = self
            .send(Operation::GetWorkspaceSnapshot, &ItemRequest::new(item.clone()))
            .await?;
        Ok(Arc::new(WorkspaceTree::from_snapshot(snapshot)))
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.handle.subscribe()
    }
}
