//! Operation dispatcher.
//!
//! Every wire operation enters through [`Dispatcher::handle`], which parses
//! the name, decodes the payload, routes it to the owning frame (or serves
//! it on the platform), decodes the result and returns it. No step is
//! skipped, so a malformed payload never reaches a frame and a malformed
//! reply never reaches a caller.

mod handle;
mod moves;
mod native_ops;


pub use handle::{serve, PlatformCall, PlatformHandle};

use std::sync::Arc;

use canopy_common::{CanopyError, FrameId, ItemId, ItemKind};
use canopy_protocol::requests::{CreateWorkspaceRequest, ItemRequest, OpenWorkspaceRequest};
use canopy_protocol::responses::{
    Empty, FrameSummaries, InWorkspaceResult, LayoutSummaries, LayoutsResult, WorkspaceSummaries,
};
use canopy_protocol::{decode, FrameSummary, Operation, Request, Response, WorkspaceLayout};
use futures_util::future::join_all;
use serde_json::Value;

use crate::coordinator::FrameCoordinator;
use crate::native::NativeWindows;
use crate::store::LayoutStore;
use crate::transport::{FrameRequest, Transport};

pub struct Dispatcher {
    coordinator: Arc<FrameCoordinator>,
    transport: Arc<dyn Transport>,
    native: Arc<dyn NativeWindows>,
    layouts: LayoutStore,
}

impl Dispatcher {
    pub fn new(
        coordinator: Arc<FrameCoordinator>,
        transport: Arc<dyn Transport>,
        native: Arc<dyn NativeWindows>,
        layouts: LayoutStore,
    ) -> Self {
        Self {
            coordinator,
            transport,
            native,
            layouts,
        }
    }

    pub fn layouts(&self) -> &LayoutStore {
        &self.layouts
    }

    pub async fn handle(
        &self,
        operation: &str,
        payload: Value,
        command_id: &str,
    ) -> Result<Value, CanopyError> {
        let operation: Operation = operation.parse()?;
        let request = Request::decode(operation, payload)?;
        tracing::debug!(%operation, command_id, "dispatching");

        let raw = match self.route(request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(%operation, command_id, error = %err, "operation failed");
                return Err(err);
            }
        };
        Response::decode(operation, raw)?.encode()
    }

    async fn route(&self, request: Request) -> Result<Value, CanopyError> {
        let operation = request.operation();
        if operation.short_circuits_frames() {
            if let Some(target) = request.target_item() {
                if self.coordinator.is_frame(target.as_str()).await {
                    return self.frame_window_op(FrameId::from(target.as_str()), request).await;
                }
                if operation == Operation::MoveFrame {
                    return Err(CanopyError::not_found(ItemKind::Frame, target.as_str()));
                }
            }
        }

        match request {
            Request::FrameHello(r) => {
                self.coordinator.hello(&r.window_id).await?;
                Response::FrameHello(Empty {}).encode()
            }
            Request::GetAllFramesSummaries(_) => {
                let summaries = self.frame_summaries().await;
                Response::GetAllFramesSummaries(FrameSummaries { summaries }).encode()
            }
            Request::GetAllWorkspacesSummaries(_) => {
                let summaries = self.workspace_summaries().await;
                Response::GetAllWorkspacesSummaries(WorkspaceSummaries { summaries }).encode()
            }
            Request::IsWindowInWorkspace(r) => {
                let frames = self.coordinator.active_frames().await;
                let answers = join_all(frames.iter().map(|frame| {
                    self.query(frame, Request::IsWindowInWorkspace(r.clone()))
                }))
                .await;
                let in_workspace = answers
                    .into_iter()
                    .flatten()
                    .any(|value| value["inWorkspace"].as_bool() == Some(true));
                Response::IsWindowInWorkspace(InWorkspaceResult { in_workspace }).encode()
            }
            Request::DeleteLayout(r) => {
                self.layouts.remove(&r.name).await?;
                Response::DeleteLayout(Empty {}).encode()
            }
            Request::ImportLayout(r) => {
                self.layouts.import(r.layouts, r.mode).await?;
                Response::ImportLayout(Empty {}).encode()
            }
            Request::ExportAllLayouts(_) => {
                let layouts = self.layouts.export().await;
                Response::ExportAllLayouts(LayoutsResult { layouts }).encode()
            }
            Request::GetAllLayoutsSummaries(_) => {
                let summaries = self.layouts.summaries().await;
                Response::GetAllLayoutsSummaries(LayoutSummaries { summaries }).encode()
            }
            Request::CreateWorkspace(r) => {
                let frame = self.coordinator.resolve(r.frame.as_ref()).await?;
                self.forward(&frame, Request::CreateWorkspace(r)).await
            }
            Request::OpenWorkspace(r) => self.open_workspace(r).await,
            Request::SaveLayout(r) => {
                let workspace = ItemId::from(&r.workspace_id);
                let frame = self.coordinator.frame_of_item(&workspace).await?;
                let raw = self.forward(&frame, Request::SaveLayout(r)).await?;
                let layout: WorkspaceLayout = decode(Operation::SaveLayout, raw.clone())?;
                tracing::info!(layout = %layout.name, workspace_id = %workspace, "layout saved");
                self.layouts.save(layout).await?;
                Ok(raw)
            }
            Request::MoveWindowTo(r) => self.move_window(r).await,
            Request::GetFrameSnapshot(r) => {
                let frame = self.frame_for(&r.item_id).await?;
                self.forward(&frame, Request::GetFrameSnapshot(r)).await
            }
            Request::GetFrameSummary(r) => {
                let frame = self.frame_for(&r.item_id).await?;
                self.forward(&frame, Request::GetFrameSummary(r)).await
            }
            other => {
                let target = other.target_item().ok_or_else(|| {
                    CanopyError::UnsupportedOperation(format!(
                        "{} has no target to route by",
                        other.operation()
                    ))
                })?;
                let frame = self.coordinator.frame_of_item(&target).await?;
                self.forward(&frame, other).await
            }
        }
    }

    /// Sends an operation into `frame` and marks the frame as recently used.
    async fn forward(&self, frame: &FrameId, request: Request) -> Result<Value, CanopyError> {
        let reply = self.query(frame, request).await?;
        self.coordinator.touch(frame).await;
        Ok(reply)
    }

    /// Like [`Self::forward`] without touching the frame, for reads that
    /// sweep every frame.
    async fn query(&self, frame: &FrameId, request: Request) -> Result<Value, CanopyError> {
        let operation = request.operation();
        let payload = request.encode()?;
        self.transport
            .call(frame, FrameRequest::Operation { operation, payload })
            .await
    }

    /// `id` may name a frame directly or any item inside one.
    async fn frame_for(&self, id: &ItemId) -> Result<FrameId, CanopyError> {
        if self.coordinator.is_frame(id.as_str()).await {
            let frame = FrameId::from(id.as_str());
            self.coordinator.require_active(&frame).await?;
            return Ok(frame);
        }
        self.coordinator.frame_of_item(id).await
    }

    async fn frame_summaries(&self) -> Vec<FrameSummary> {
        let frames = self.coordinator.active_frames().await;
        let replies = join_all(frames.iter().map(|frame| {
            let request = Request::GetFrameSummary(ItemRequest::new(frame.as_str()));
            async move {
                let raw = self.query(frame, request).await?;
                decode::<FrameSummary>(Operation::GetFrameSummary, raw)
            }
        }))
        .await;
        collect_answers(&frames, replies)
    }

    async fn workspace_summaries(&self) -> Vec<canopy_protocol::WorkspaceSummary> {
        let frames = self.coordinator.active_frames().await;
        let replies = join_all(frames.iter().map(|frame| {
            let request = Request::GetAllWorkspacesSummaries(Default::default());
            async move {
                let raw = self.query(frame, request).await?;
                decode::<WorkspaceSummaries>(Operation::GetAllWorkspacesSummaries, raw)
            }
        }))
        .await;
        collect_answers(&frames, replies)
            .into_iter()
            .flat_map(|reply| reply.summaries)
            .collect()
    }

    /// Creates a workspace from a stored layout. Restore options override
    /// the saved title, context and selection.
    async fn open_workspace(&self, request: OpenWorkspaceRequest) -> Result<Value, CanopyError> {
        let layout = self.layouts.get(&request.name).await?;
        let state = layout.state().cloned().unwrap_or_default();
        let options = request.restore_options.unwrap_or_default();

        let children = state.to_definitions();
        let mut config = state.config;
        if options.title.is_some() {
            config.title = options.title;
        }
        let saved_context = match state.context {
            Value::Null => None,
            context => Some(context),
        };
        let create = CreateWorkspaceRequest {
            children,
            config,
            frame: None,
            context: options.context.or(saved_context),
            is_selected: options.is_selected,
            layout_name: Some(layout.name.clone()),
        };

        let frame = self.coordinator.resolve(options.frame.as_ref()).await?;
        tracing::info!(layout = %layout.name, frame_id = %frame, "opening layout");
        self.forward(&frame, Request::CreateWorkspace(create)).await
    }
}

/// Keeps the answers that arrived. A frame that fails mid-aggregation is
/// usually one that just disappeared.
fn collect_answers<T>(frames: &[FrameId], replies: Vec<Result<T, CanopyError>>) -> Vec<T> {
    frames
        .iter()
        .zip(replies)
        .filter_map(|(frame, reply)| match reply {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(frame_id = %frame, error = %err, "frame skipped in aggregate");
                None
            }
        })
        .collect()
}
