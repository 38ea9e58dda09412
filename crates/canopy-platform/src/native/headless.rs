//! In-memory window service used by the CLI and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use canopy_common::{Bounds, CanopyError, ItemKind};
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use super::{NativeEvent, NativeWindow, NativeWindows, OpenWindow, Result, WindowRole};

/// Windows exist only as records. App windows can be made to appear after
/// a delay, to exercise load timeouts.
pub struct HeadlessWindows {
    windows: Arc<RwLock<HashMap<String, NativeWindow>>>,
    events: broadcast::Sender<NativeEvent>,
    next_id: AtomicU64,
    popups_blocked: AtomicBool,
    load_delay: Option<Duration>,
}

impl HeadlessWindows {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            events,
            next_id: AtomicU64::new(1),
            popups_blocked: AtomicBool::new(false),
            load_delay: None,
        }
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Makes every following `open` fail as a blocked popup.
    pub fn block_popups(&self, blocked: bool) {
        self.popups_blocked.store(blocked, Ordering::SeqCst);
    }

    /// Drops a window as if the user closed it outside the platform.
    pub async fn vanish(&self, id: &str) {
        if self.windows.write().await.remove(id).is_some() {
            let _ = self.events.send(NativeEvent::WindowRemoved(id.to_string()));
        }
    }
}

impl Default for HeadlessWindows {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NativeWindows for HeadlessWindows {
    async fn open(&self, request: OpenWindow) -> Result<String> {
        if self.popups_blocked.load(Ordering::SeqCst) {
            return Err(CanopyError::PopupBlocked(
                request.app_name.unwrap_or_else(|| "frame".into()),
            ));
        }

        let id = format!("native-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let window = NativeWindow {
            id: id.clone(),
            role: request.role,
            app_name: request.app_name,
            url: request.url,
            title: request.title,
            bounds: request.bounds.unwrap_or_default(),
            context: request.context.unwrap_or(Value::Null),
        };
        tracing::debug!(window_id = %id, role = ?window.role, "native window opened");

        match self.load_delay.filter(|_| window.role == WindowRole::App) {
            Some(delay) => {
                let windows = Arc::clone(&self.windows);
                let events = self.events.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let id = window.id.clone();
                    windows.write().await.insert(id.clone(), window);
                    let _ = events.send(NativeEvent::WindowAdded(id));
                });
            }
            None => {
                self.windows.write().await.insert(id.clone(), window);
                let _ = self.events.send(NativeEvent::WindowAdded(id.clone()));
            }
        }
        Ok(id)
    }

    async fn close(&self, id: &str) -> Result<()> {
        if self.windows.write().await.remove(id).is_none() {
            return Err(CanopyError::not_found(ItemKind::Window, id));
        }
        let _ = self.events.send(NativeEvent::WindowRemoved(id.to_string()));
        Ok(())
    }

    async fn focus(&self, id: &str) -> Result<()> {
        if !self.windows.read().await.contains_key(id) {
            return Err(CanopyError::not_found(ItemKind::Window, id));
        }
        tracing::trace!(window_id = %id, "native window focused");
        Ok(())
    }

    async fn set_bounds(&self, id: &str, bounds: Bounds) -> Result<()> {
        match self.windows.write().await.get_mut(id) {
            Some(window) => {
                window.bounds = bounds;
                Ok(())
            }
            None => Err(CanopyError::not_found(ItemKind::Window, id)),
        }
    }

    async fn find(&self, id: &str) -> Option<NativeWindow> {
        self.windows.read().await.get(id).cloned()
    }

    async fn list(&self) -> Vec<NativeWindow> {
        let mut windows: Vec<NativeWindow> = self.windows.read().await.values().cloned().collect();
        windows.sort_by(|a, b| a.id.cmp(&b.id));
        windows
    }

    async fn context(&self, id: &str) -> Result<Value> {
        self.windows
            .read()
            .await
            .get(id)
            .map(|window| window.context.clone())
            .ok_or_else(|| CanopyError::not_found(ItemKind::Window, id))
    }

    async fn set_context(&self, id: &str, context: Value) -> Result<()> {
        match self.windows.write().await.get_mut(id) {
            Some(window) => {
                window.context = context;
                Ok(())
            }
            None => Err(CanopyError::not_found(ItemKind::Window, id)),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<NativeEvent> {
        self.events.subscribe()
    }
}
