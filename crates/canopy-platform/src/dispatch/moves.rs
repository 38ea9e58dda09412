use canopy_common::{BoxType, CanopyError, FrameId, ItemId};
use canopy_layout::NodeKind;
use canopy_protocol::requests::{ItemRequest, MoveWindowToRequest};
use canopy_protocol::responses::Empty;
use canopy_protocol::{decode, BoxDefinition, Operation, Request, Response, WorkspaceSnapshot};
use serde_json::Value;

use super::Dispatcher;
use crate::transport::FrameRequest;

impl Dispatcher {
    /// Moves a window, across frames when its target lives elsewhere.
    pub(super) async fn move_window(&self, request: MoveWindowToRequest) -> Result<Value, CanopyError> {
        let source = self.coordinator.frame_of_item(&request.item_id).await?;
        let target = self.coordinator.frame_of_item(&request.container_id).await?;
        if source == target {
            return self.forward(&source, Request::MoveWindowTo(request)).await;
        }

        self.check_destination(&target, &request.container_id).await?;
        let home = self.workspace_of(&source, &request.item_id).await?;

        let taken = self
            .transport
            .call(
                &source,
                FrameRequest::TakeWindow {
                    item_id: request.item_id.clone(),
                },
            )
            .await?;
        let definition: BoxDefinition = serde_json::from_value(taken)
            .map_err(|e| CanopyError::Transport(format!("bad window definition: {e}")))?;

        let placed = self
            .transport
            .call(
                &target,
                FrameRequest::PlaceWindow {
                    container_id: request.container_id.clone(),
                    definition: definition.clone(),
                },
            )
            .await;
        if let Err(err) = placed {
            tracing::warn!(
                item_id = %request.item_id,
                frame_id = %target,
                error = %err,
                "target refused window, returning it"
            );
            let back = FrameRequest::PlaceWindow {
                container_id: ItemId::from(&home.id),
                definition,
            };
            if let Err(again) = self.transport.call(&source, back).await {
                tracing::error!(item_id = %request.item_id, error = %again, "window lost in move");
            }
            return Err(err);
        }

        self.coordinator.touch(&target).await;
        tracing::info!(
            item_id = %request.item_id,
            from = %source,
            to = %target,
            "window moved across frames"
        );
        Response::MoveWindowTo(Empty {}).encode()
    }

    async fn workspace_of(&self, frame: &FrameId, item: &ItemId) -> Result<WorkspaceSnapshot, CanopyError> {
        let raw = self
            .query(frame, Request::GetWorkspaceSnapshot(ItemRequest::new(item.clone())))
            .await?;
        decode(Operation::GetWorkspaceSnapshot, raw)
    }

    /// Refuses a destination before the window is detached from its source.
    async fn check_destination(&self, frame: &FrameId, container: &ItemId) -> Result<(), CanopyError> {
        let workspace = self.workspace_of(frame, container).await?;
        if workspace.config.is_hibernated {
            return Err(CanopyError::UnsupportedOperation(format!(
                "workspace {} is hibernated",
                workspace.id
            )));
        }
        let kind = if ItemId::from(&workspace.id) == *container {
            NodeKind::Workspace
        } else {
            workspace
                .find(container)
                .map(|node| NodeKind::from(node.box_type))
                .unwrap_or(NodeKind::Workspace)
        };
        if !kind.can_contain(BoxType::Window) {
            return Err(CanopyError::InvalidChildType {
                parent: kind.as_str().to_string(),
                child: BoxType::Window,
            });
        }
        Ok(())
    }
}
