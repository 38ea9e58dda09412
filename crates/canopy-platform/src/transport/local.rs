use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use canopy_common::{CanopyError, Event, EventBus, FrameId};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};

use super::{FrameCall, FrameRequest, Transport, TransportError};

/// Transport between tasks of one process.
pub struct LocalTransport {
    peers: RwLock<HashMap<FrameId, mpsc::Sender<FrameCall>>>,
    events: EventBus,
    timeout: Duration,
}

impl LocalTransport {
    pub fn new(events: EventBus, timeout: Duration) -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
            events,
            timeout,
        }
    }

    async fn peer(&self, frame: &FrameId) -> Result<mpsc::Sender<FrameCall>, TransportError> {
        self.peers
            .read()
            .await
            .get(frame)
            .cloned()
            .ok_or_else(|| TransportError::Disconnected(frame.clone()))
    }

    async fn send(&self, frame: &FrameId, request: FrameRequest) -> Result<Value, CanopyError> {
        let peer = self.peer(frame).await?;
        let (tx, rx) = oneshot::channel();
        peer.send(FrameCall {
            request,
            respond_to: tx,
        })
        .await
        .map_err(|_| TransportError::Disconnected(frame.clone()))?;
        rx.await.map_err(|_| TransportError::NoReply(frame.clone()))?
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn connect(&self, frame: FrameId, inbox: mpsc::Sender<FrameCall>) {
        tracing::debug!(frame_id = %frame, "frame connected");
        self.peers.write().await.insert(frame, inbox);
    }

    async fn disconnect(&self, frame: &FrameId) -> bool {
        let removed = self.peers.write().await.remove(frame).is_some();
        if removed {
            tracing::debug!(frame_id = %frame, "frame disconnected");
        }
        removed
    }

    async fn is_connected(&self, frame: &FrameId) -> bool {
        self.peers.read().await.contains_key(frame)
    }

    async fn call(&self, frame: &FrameId, request: FrameRequest) -> Result<Value, CanopyError> {
        tokio::time::timeout(self.timeout, self.send(frame, request))
            .await
            .map_err(|_| TransportError::Timeout {
                frame: frame.clone(),
                after: self.timeout,
            })?
    }

    fn publish(&self, event: Event) {
        self.events.publish(event);
    }

    fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}
