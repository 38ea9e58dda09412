//! Opening and closing the native windows behind tree windows.

use canopy_common::{CanopyError, ItemId, ItemKind};
use canopy_layout::{Node, WindowState};
use tokio::sync::broadcast::error::RecvError;

use super::FrameHost;
use crate::native::{NativeEvent, OpenWindow};

impl FrameHost {
    /// Opens the native window for `id` and waits until the service
    /// reports it, bounded by the load timeout.
    pub(super) async fn load_window(
        &mut self,
        id: &ItemId,
        window: &WindowState,
    ) -> Result<String, CanopyError> {
        let mut added = self.native.subscribe();
        let window_id = self.native.open(OpenWindow::app(window)).await?;

        let native = &self.native;
        let appeared = async {
            if native.find(&window_id).await.is_some() {
                return Ok(());
            }
            loop {
                match added.recv().await {
                    Ok(NativeEvent::WindowAdded(added_id)) if added_id == window_id => return Ok(()),
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        if native.find(&window_id).await.is_some() {
                            return Ok(());
                        }
                    }
                    Err(RecvError::Closed) => {
                        return Err(CanopyError::Transport("native event stream closed".into()))
                    }
                }
            }
        };

        match tokio::time::timeout(self.load_timeout, appeared).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(item_id = %id, window_id = %window_id, "window did not finish loading");
                if let Err(err) = self.native.close(&window_id).await {
                    tracing::debug!(window_id = %window_id, error = %err, "cleanup of slow window failed");
                }
                return Err(CanopyError::timeout(
                    format!("window {id} to load"),
                    self.load_timeout.as_millis() as u64,
                ));
            }
        }

        self.model.mark_loaded(id, &window_id)?;
        tracing::debug!(item_id = %id, window_id = %window_id, "window loaded");
        Ok(window_id)
    }

    /// Loads every unloaded window of the selected workspace. Failures are
    /// logged and leave the window unloaded.
    pub(super) async fn load_pending(&mut self) {
        for (id, window) in self.model.pending_loads() {
            if let Err(err) = self.load_window(&id, &window).await {
                tracing::warn!(item_id = %id, error = %err, "window load failed");
            }
        }
    }

    /// Loads window `id` when its workspace is on screen. Returns its
    /// native id if it has one afterwards.
    pub(super) async fn load_if_visible(&mut self, id: &ItemId) -> Result<Option<String>, CanopyError> {
        let visible = self
            .model
            .locate(id)
            .map(|located| self.model.workspaces()[located.workspace_index()].is_selected())
            .unwrap_or(false);
        match self.model.unloaded_window(id)? {
            Some(window) if visible => self.load_window(id, &window).await.map(Some),
            Some(_) => Ok(None),
            None => self.loaded_window_id(id).map(Some),
        }
    }

    /// Loads a window that was just added. When the load fails the window
    /// is taken out of the tree again, so a failed add leaves nothing behind.
    pub(super) async fn load_added(&mut self, id: &ItemId) -> Result<Option<String>, CanopyError> {
        let err = match self.load_if_visible(id).await {
            Ok(window_id) => return Ok(window_id),
            Err(err) => err,
        };
        match self.model.close_item(id) {
            Ok(removed) => self.close_native(&removed).await,
            Err(close_err) => {
                tracing::debug!(item_id = %id, error = %close_err, "failed window already gone")
            }
        }
        tracing::warn!(item_id = %id, error = %err, "window removed after failed load");
        Err(err)
    }

    pub(super) fn loaded_window_id(&self, id: &ItemId) -> Result<String, CanopyError> {
        let (_, node) = self
            .model
            .workspaces()
            .iter()
            .find_map(|ws| ws.tree().get(id).map(|node| (ws, node)))
            .ok_or_else(|| CanopyError::not_found(ItemKind::Window, id.as_str()))?;
        node.window
            .as_ref()
            .and_then(|w| w.window_id.clone())
            .ok_or_else(|| CanopyError::UnsupportedOperation(format!("{id} has no native window")))
    }

    /// Closes the native windows of removed tree windows.
    pub(super) async fn close_native(&self, removed: &[Node]) {
        let handles = removed
            .iter()
            .filter_map(|node| node.window.as_ref())
            .filter_map(|window| window.window_id.as_deref());
        for window_id in handles {
            if let Err(err) = self.native.close(window_id).await {
                tracing::debug!(window_id, error = %err, "native window already gone");
            }
        }
    }

    pub(super) async fn focus_native(&self, id: &ItemId) {
        if let Ok(window_id) = self.loaded_window_id(id) {
            if let Err(err) = self.native.focus(&window_id).await {
                tracing::debug!(window_id = %window_id, error = %err, "native focus failed");
            }
        }
    }

    /// Closes this frame's own native window once it hosts nothing. The
    /// coordinator tears the frame down when the service reports it gone.
    pub(super) async fn close_own_window(&self) {
        let frame = self.model.id().clone();
        tracing::info!(frame_id = %frame, "last workspace closed, closing frame window");
        if let Err(err) = self.native.close(frame.as_str()).await {
            tracing::debug!(frame_id = %frame, error = %err, "frame window already gone");
        }
    }
}
