//! Operations on a frame's own native window.

use canopy_common::{Bounds, CanopyError, FrameId, ItemKind};
use canopy_protocol::responses::Empty;
use canopy_protocol::{Request, Response};
use serde_json::Value;

use super::Dispatcher;
use crate::transport::FrameRequest;

fn shifted(current: i32, requested: Option<i32>, relative: bool) -> i32 {
    match requested {
        Some(delta) if relative => current.saturating_add(delta),
        Some(value) => value,
        None => current,
    }
}

fn resized(current: u32, requested: Option<i32>, relative: bool) -> u32 {
    match requested {
        Some(delta) if relative => current.saturating_add_signed(delta),
        Some(value) => value.max(0) as u32,
        None => current,
    }
}

impl Dispatcher {
    /// Serves close/focus/resize/move when the target is a frame: the frame
    /// is handled as a native window, not as a tree node.
    pub(super) async fn frame_window_op(&self, frame: FrameId, request: Request) -> Result<Value, CanopyError> {
        match request {
            Request::CloseItem(_) => {
                self.coordinator.disappeared(&frame).await;
                if let Err(err) = self.native.close(frame.as_str()).await {
                    tracing::debug!(frame_id = %frame, error = %err, "frame window already gone");
                }
                Response::CloseItem(Empty {}).encode()
            }
            Request::FocusItem(_) => {
                self.native.focus(frame.as_str()).await?;
                self.coordinator.touch(&frame).await;
                Response::FocusItem(Empty {}).encode()
            }
            Request::ResizeItem(r) => {
                let current = self.frame_bounds(&frame).await?;
                let bounds = Bounds {
                    width: resized(current.width, r.width, r.relative),
                    height: resized(current.height, r.height, r.relative),
                    ..current
                };
                self.native.set_bounds(frame.as_str(), bounds).await?;
                self.transport
                    .call(&frame, FrameRequest::Resize { size: bounds.size() })
                    .await?;
                tracing::debug!(frame_id = %frame, width = bounds.width, height = bounds.height, "frame resized");
                Response::ResizeItem(Empty {}).encode()
            }
            Request::MoveFrame(r) => {
                let current = self.frame_bounds(&frame).await?;
                let bounds = Bounds {
                    left: shifted(current.left, r.left, r.relative),
                    top: shifted(current.top, r.top, r.relative),
                    ..current
                };
                self.native.set_bounds(frame.as_str(), bounds).await?;
                Response::MoveFrame(Empty {}).encode()
            }
            other => Err(CanopyError::UnsupportedOperation(format!(
                "{} does not apply to frame {frame}",
                other.operation()
            ))),
        }
    }

    async fn frame_bounds(&self, frame: &FrameId) -> Result<Bounds, CanopyError> {
        self.native
            .find(frame.as_str())
            .await
            .map(|window| window.bounds)
            .ok_or_else(|| CanopyError::not_found(ItemKind::Frame, frame.as_str()))
    }
}
