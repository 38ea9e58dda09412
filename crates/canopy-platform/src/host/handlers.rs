//! Wire operations served inside a frame.

use canopy_common::{CanopyError, ItemId};
use canopy_layout::{LockRequest, NodeKind, WorkspaceOptions};
use canopy_protocol::requests::ParentType;
use canopy_protocol::responses::{
    AddItemResult, Empty, InWorkspaceResult, WindowIdResult, WorkspaceSummaries,
};
use canopy_protocol::{LockTarget, Operation, Request, Response};
use serde_json::Value;

use super::FrameHost;
use crate::native::OpenWindow;

fn parent_kind(parent: ParentType) -> NodeKind {
    parent
        .box_type()
        .map(NodeKind::from)
        .unwrap_or(NodeKind::Workspace)
}

impl FrameHost {
    /// Decodes, applies and encodes one operation.
    pub(super) async fn handle_operation(
        &mut self,
        operation: Operation,
        payload: Value,
    ) -> Result<Value, CanopyError> {
        let request = Request::decode(operation, payload)?;
        tracing::debug!(frame_id = %self.model.id(), %operation, "frame handling operation");
        self.apply(request).await?.encode()
    }

    async fn apply(&mut self, request: Request) -> Result<Response, CanopyError> {
        let empty = Empty {};
        let response = match request {
            Request::CreateWorkspace(r) => {
                let options = WorkspaceOptions {
                    title: r.config.title,
                    layout_name: r.layout_name,
                    context: r.context.unwrap_or(Value::Null),
                    locks: r.config.settings.locks,
                };
                let select = r.is_selected.unwrap_or(true);
                let (id, applied) = self.model.create_workspace(options, &r.children, select)?;
                if !applied {
                    tracing::warn!(workspace_id = %id, "some requested constraints were dropped");
                }
                self.load_pending().await;
                Response::CreateWorkspace(self.model.workspace_snapshot(&id)?)
            }
            Request::GetWorkspaceSnapshot(r) => {
                Response::GetWorkspaceSnapshot(self.model.snapshot_of_item(&r.item_id)?)
            }
            Request::GetAllWorkspacesSummaries(_) => {
                Response::GetAllWorkspacesSummaries(WorkspaceSummaries {
                    summaries: self.model.workspace_summaries(),
                })
            }
            Request::GetFrameSnapshot(_) => Response::GetFrameSnapshot(self.model.snapshot()),
            Request::GetFrameSummary(_) => Response::GetFrameSummary(self.model.summary()),
            Request::AddWindow(r) => {
                let outcome = self.model.add_box(
                    &r.parent_id,
                    Some(parent_kind(r.parent_type)),
                    &r.definition,
                )?;
                let window_id = self.load_added(&outcome.id).await?;
                Response::AddWindow(AddItemResult {
                    item_id: outcome.id,
                    window_id,
                    constraints_applied: outcome.constraints_applied,
                })
            }
            Request::AddContainer(r) => {
                let outcome = self.model.add_box(
                    &r.parent_id,
                    Some(parent_kind(r.parent_type)),
                    &r.definition,
                )?;
                self.load_pending().await;
                Response::AddContainer(AddItemResult {
                    item_id: outcome.id,
                    window_id: None,
                    constraints_applied: outcome.constraints_applied,
                })
            }
            Request::MoveWindowTo(r) => {
                self.model.move_window(&r.item_id, &r.container_id)?;
                self.load_pending().await;
                Response::MoveWindowTo(empty)
            }
            Request::ResizeItem(r) => {
                self.model
                    .resize_item(&r.item_id, r.width, r.height, r.relative)?;
                Response::ResizeItem(empty)
            }
            Request::CloseItem(r) => {
                let removed = self.model.close_item(&r.item_id)?;
                self.close_native(&removed).await;
                if self.model.is_empty() {
                    self.close_own_window().await;
                }
                Response::CloseItem(empty)
            }
            Request::RestoreItem(r) => {
                self.model.restore(&r.item_id)?;
                Response::RestoreItem(empty)
            }
            Request::MaximizeItem(r) => {
                self.model.maximize(&r.item_id)?;
                Response::MaximizeItem(empty)
            }
            Request::FocusItem(r) => {
                self.model.focus(&r.item_id)?;
                self.load_pending().await;
                self.focus_native(&r.item_id).await;
                Response::FocusItem(empty)
            }
            Request::SetItemTitle(r) => {
                self.model.set_title(&r.item_id, &r.title)?;
                Response::SetItemTitle(empty)
            }
            Request::ForceLoadWindow(r) => {
                let window_id = match self.model.unloaded_window(&r.item_id)? {
                    Some(window) => self.load_window(&r.item_id, &window).await?,
                    None => self.loaded_window_id(&r.item_id)?,
                };
                Response::ForceLoadWindow(WindowIdResult { window_id })
            }
            Request::EjectWindow(r) => {
                let definition = self.model.eject(&r.item_id)?;
                let window_id = match definition.window_id.clone() {
                    Some(existing) => existing,
                    None => self.native.open(OpenWindow::standalone(&definition)).await?,
                };
                tracing::info!(item_id = %r.item_id, window_id = %window_id, "window ejected");
                Response::EjectWindow(WindowIdResult { window_id })
            }
            Request::BundleWorkspace(r) => {
                self.model
                    .bundle(&r.workspace_id, r.bundle_type.box_type())?;
                Response::BundleWorkspace(empty)
            }
            Request::HibernateWorkspace(r) => {
                let removed = self.model.hibernate(&r.workspace_id)?;
                self.close_native(&removed).await;
                Response::HibernateWorkspace(empty)
            }
            Request::ResumeWorkspace(r) => {
                self.model.resume(&r.workspace_id)?;
                self.load_pending().await;
                Response::ResumeWorkspace(empty)
            }
            Request::LockWorkspace(r) => {
                self.model.lock(
                    &ItemId::from(&r.workspace_id),
                    LockTarget::Workspace,
                    LockRequest::from_wire(r.config),
                )?;
                Response::LockWorkspace(empty)
            }
            Request::LockContainer(r) => {
                self.model.lock(
                    &r.item_id,
                    LockTarget::from(r.container_type),
                    LockRequest::from_wire(r.config),
                )?;
                Response::LockContainer(empty)
            }
            Request::LockWindow(r) => {
                self.model.lock(
                    &r.item_id,
                    LockTarget::Window,
                    LockRequest::from_wire(r.config),
                )?;
                Response::LockWindow(empty)
            }
            Request::SaveLayout(r) => Response::SaveLayout(self.model.save_layout(
                &r.workspace_id,
                &r.name,
                r.save_context,
                r.metadata.unwrap_or(Value::Null),
            )?),
            Request::IsWindowInWorkspace(r) => {
                Response::IsWindowInWorkspace(InWorkspaceResult {
                    in_workspace: self.model.is_window_in_workspace(&r.window_id),
                })
            }
            other => {
                return Err(CanopyError::UnsupportedOperation(format!(
                    "{} is not served by frames",
                    other.operation()
                )))
            }
        };
        Ok(response)
    }
}
