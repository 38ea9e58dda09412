//! Request/response and event transport between the platform and frames.
//!
//! A frame registers an inbox under its id; the platform calls it with a
//! [`FrameRequest`] and waits, bounded by the request timeout, for the JSON
//! reply. Events flow the other way over the shared [`EventBus`].

mod local;

pub use local::LocalTransport;

use std::time::Duration;

use async_trait::async_trait;
use canopy_common::{CanopyError, Event, FrameId, ItemId, Size};
use canopy_protocol::{BoxDefinition, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};

/// What the platform asks of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrameRequest {
    /// A wire operation with its encoded request payload.
    Operation { operation: Operation, payload: Value },
    /// Whether the frame hosts `item_id`. Replies with a bool.
    #[serde(rename_all = "camelCase")]
    Locate { item_id: ItemId },
    /// Detach a window so another frame can adopt it. Replies with its
    /// definition.
    #[serde(rename_all = "camelCase")]
    TakeWindow { item_id: ItemId },
    /// Adopt a window detached from another frame.
    #[serde(rename_all = "camelCase")]
    PlaceWindow {
        container_id: ItemId,
        definition: BoxDefinition,
    },
    /// The frame's native window changed size.
    Resize { size: Size },
    /// The frame's native window is gone: close everything and stop.
    Shutdown,
}

/// One request in flight, with the channel its reply goes back on.
#[derive(Debug)]
pub struct FrameCall {
    pub request: FrameRequest,
    pub respond_to: oneshot::Sender<Result<Value, CanopyError>>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("frame {0} is not connected")]
    Disconnected(FrameId),

    #[error("frame {0} dropped the call without replying")]
    NoReply(FrameId),

    #[error("call to frame {frame} timed out after {after:?}")]
    Timeout { frame: FrameId, after: Duration },
}

impl From<TransportError> for CanopyError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { frame, after } => {
                CanopyError::timeout(format!("frame {frame}"), after.as_millis() as u64)
            }
            other => CanopyError::Transport(other.to_string()),
        }
    }
}

/// Peer registry plus event stream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Registers the inbox of frame `frame`, replacing any previous one.
    async fn connect(&self, frame: FrameId, inbox: mpsc::Sender<FrameCall>);

    /// Drops the inbox of `frame`. Returns whether one was registered.
    async fn disconnect(&self, frame: &FrameId) -> bool;

    async fn is_connected(&self, frame: &FrameId) -> bool;

    /// Sends `request` to `frame` and waits for the reply.
    async fn call(&self, frame: &FrameId, request: FrameRequest) -> Result<Value, CanopyError>;

    fn publish(&self, event: Event);

    fn subscribe(&self) -> broadcast::Receiver<Event>;
}
