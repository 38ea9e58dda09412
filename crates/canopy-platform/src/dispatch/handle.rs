//! Cloneable entry point to the dispatcher.
//!
//! Callers hold a [`PlatformHandle`]; every call travels over one mpsc
//! channel to [`serve`], which hands it to the dispatcher and sends the
//! reply back on a oneshot.

use std::sync::Arc;

use canopy_common::{new_command_id, CanopyError, Event, EventBus};
use canopy_protocol::{Request, Response};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use super::Dispatcher;

/// One operation in flight.
#[derive(Debug)]
pub struct PlatformCall {
    pub operation: String,
    pub payload: Value,
    pub command_id: String,
    pub respond_to: oneshot::Sender<Result<Value, CanopyError>>,
}

#[derive(Clone)]
pub struct PlatformHandle {
    sender: mpsc::Sender<PlatformCall>,
    events: EventBus,
}

impl PlatformHandle {
    /// A handle plus the receiving end [`serve`] drains.
    pub fn channel(capacity: usize, events: EventBus) -> (Self, mpsc::Receiver<PlatformCall>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender, events }, receiver)
    }

    /// Runs `operation` with a raw JSON payload.
    pub async fn call(&self, operation: &str, payload: Value) -> Result<Value, CanopyError> {
        let (tx, rx) = oneshot::channel();
        let call = PlatformCall {
            operation: operation.to_string(),
            payload,
            command_id: new_command_id(),
            respond_to: tx,
        };
        self.sender
            .send(call)
            .await
            .map_err(|_| CanopyError::Transport("platform is not running".into()))?;
        rx.await
            .map_err(|_| CanopyError::Transport("platform dropped the call".into()))?
    }

    /// Runs a typed request and decodes the typed result.
    pub async fn request(&self, request: Request) -> Result<Response, CanopyError> {
        let operation = request.operation();
        let value = self.call(operation.as_str(), request.encode()?).await?;
        Response::decode(operation, value)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

/// Serves calls until every handle is dropped.
///
/// Each call runs on its own task: a frame launched while serving one call
/// says hello through this same channel, so calls must not wait on each
/// other here.
pub fn serve(dispatcher: Arc<Dispatcher>, mut inbox: mpsc::Receiver<PlatformCall>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(call) = inbox.recv().await {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let result = dispatcher
                    .handle(&call.operation, call.payload, &call.command_id)
                    .await;
                if call.respond_to.send(result).is_err() {
                    tracing::debug!(command_id = %call.command_id, "caller went away before reply");
                }
            });
        }
        tracing::debug!("platform inbox closed");
    })
}
