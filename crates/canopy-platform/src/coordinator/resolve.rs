//! Frame selection and opening.

use std::time::Duration;

use canopy_common::{Bounds, CanopyError, FrameId, ItemId, ItemKind};
use canopy_protocol::requests::FrameSelector;
use tokio::sync::oneshot;

use super::{FrameCoordinator, FrameEntry, FrameState};
use crate::native::OpenWindow;
use crate::transport::FrameRequest;

impl FrameCoordinator {
    /// Picks the frame a new workspace goes to.
    ///
    /// At most one selector key may be set. An explicit frame id must name
    /// an active frame; an item id picks the frame hosting that item; a
    /// new-frame request opens one; otherwise the most recently active frame
    /// is used, or a new one when there is none.
    pub async fn resolve(&self, selector: Option<&FrameSelector>) -> Result<FrameId, CanopyError> {
        let selector = selector.cloned().unwrap_or_default();
        selector.check_exclusive()?;

        if let Some(frame) = selector.frame_id {
            self.require_active(&frame).await?;
            return Ok(frame);
        }
        if let Some(item) = selector.item_id {
            return self.frame_of_item(&item).await;
        }
        if let Some(new_frame) = selector.new_frame.filter(|n| n.requested()) {
            return self.open_frame(new_frame.bounds()).await;
        }
        match self.active_frames().await.into_iter().next() {
            Some(frame) => Ok(frame),
            None => self.open_frame(None).await,
        }
    }

    pub async fn require_active(&self, frame: &FrameId) -> Result<(), CanopyError> {
        match self.state(frame).await {
            Some(FrameState::Active) => Ok(()),
            _ => Err(CanopyError::not_found(ItemKind::Frame, frame.as_str())),
        }
    }

    /// The active frame hosting `item`. Each frame is asked in turn, most
    /// recently active first; the first to claim it wins.
    pub async fn frame_of_item(&self, item: &ItemId) -> Result<FrameId, CanopyError> {
        for frame in self.active_frames().await {
            let request = FrameRequest::Locate {
                item_id: item.clone(),
            };
            match self.transport.call(&frame, request).await {
                Ok(found) if found.as_bool() == Some(true) => return Ok(frame),
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(frame_id = %frame, error = %err, "frame did not answer lookup");
                }
            }
        }
        Err(CanopyError::not_found(ItemKind::Item, item.as_str()))
    }

    /// Opens a frame window and waits for its hello. A frame that stays
    /// silent past the hello timeout is torn down and the call fails.
    pub async fn open_frame(&self, bounds: Option<Bounds>) -> Result<FrameId, CanopyError> {
        let bounds = bounds.unwrap_or(Bounds {
            left: 0,
            top: 0,
            width: self.config.default_width,
            height: self.config.default_height,
        });
        let frame = FrameId::from(self.native.open(OpenWindow::frame(bounds)).await?);
        let (hello_tx, hello_rx) = oneshot::channel();
        self.frames.write().await.insert(
            frame.clone(),
            FrameEntry {
                state: FrameState::Opening,
                last_active: 0,
                hello: Some(hello_tx),
            },
        );
        tracing::info!(frame_id = %frame, "frame opening");

        if let Err(err) = self.launcher.launch(frame.clone(), bounds.size()).await {
            self.abandon(&frame).await;
            return Err(err);
        }
        if let Some(entry) = self.frames.write().await.get_mut(&frame) {
            if entry.state == FrameState::Opening {
                entry.state = FrameState::AwaitingHello;
            }
        }

        let timeout = Duration::from_millis(self.config.hello_timeout_ms);
        match tokio::time::timeout(timeout, hello_rx).await {
            Ok(Ok(())) => Ok(frame),
            Ok(Err(_)) => Err(CanopyError::not_found(ItemKind::Frame, frame.as_str())),
            Err(_) => {
                tracing::warn!(frame_id = %frame, timeout_ms = self.config.hello_timeout_ms, "frame never said hello");
                self.abandon(&frame).await;
                Err(CanopyError::timeout(
                    format!("hello from frame {frame}"),
                    self.config.hello_timeout_ms,
                ))
            }
        }
    }

    /// Best-effort cleanup of a frame that never became active.
    async fn abandon(&self, frame: &FrameId) {
        self.frames.write().await.remove(frame);
        self.transport.disconnect(frame).await;
        if let Err(err) = self.native.close(frame.as_str()).await {
            tracing::debug!(frame_id = %frame, error = %err, "abandoned frame window already gone");
        }
    }
}
