//! Frame registry and lifecycle.
//!
//! Every frame moves through `Opening -> AwaitingHello -> Active` and
//! leaves the registry when its native window disappears. The registry is
//! owned here; everything else reaches it through the dispatcher.

mod launcher;
mod resolve;

pub use launcher::{FrameLauncher, LocalLauncher};

use std::collections::HashMap;
use std::sync::Arc;

use canopy_common::{monotonic_millis, CanopyError, FrameId, ItemKind};
use canopy_config::FramesConfig;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;

use crate::native::{NativeEvent, NativeWindows};
use crate::transport::{FrameRequest, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Native window requested, document not started yet.
    Opening,
    /// Document started, hello not received yet.
    AwaitingHello,
    Active,
}

struct FrameEntry {
    state: FrameState,
    last_active: i64,
    hello: Option<oneshot::Sender<()>>,
}

pub struct FrameCoordinator {
    frames: RwLock<HashMap<FrameId, FrameEntry>>,
    native: Arc<dyn NativeWindows>,
    transport: Arc<dyn Transport>,
    launcher: Arc<dyn FrameLauncher>,
    config: FramesConfig,
}

impl FrameCoordinator {
    pub fn new(
        native: Arc<dyn NativeWindows>,
        transport: Arc<dyn Transport>,
        launcher: Arc<dyn FrameLauncher>,
        config: FramesConfig,
    ) -> Self {
        Self {
            frames: RwLock::new(HashMap::new()),
            native,
            transport,
            launcher,
            config,
        }
    }

    pub async fn state(&self, frame: &FrameId) -> Option<FrameState> {
        self.frames.read().await.get(frame).map(|entry| entry.state)
    }

    /// Whether `id` names a known frame, in any state.
    pub async fn is_frame(&self, id: &str) -> bool {
        self.frames.read().await.contains_key(&FrameId::from(id))
    }

    /// Active frames, most recently active first.
    pub async fn active_frames(&self) -> Vec<FrameId> {
        let frames = self.frames.read().await;
        let mut active: Vec<(&FrameId, i64)> = frames
            .iter()
            .filter(|(_, entry)| entry.state == FrameState::Active)
            .map(|(id, entry)| (id, entry.last_active))
            .collect();
        active.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        active.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// Marks `frame` as the most recently used one.
    pub async fn touch(&self, frame: &FrameId) {
        if let Some(entry) = self.frames.write().await.get_mut(frame) {
            entry.last_active = monotonic_millis();
        }
    }

    /// A frame announced it is ready. Frames the registry has not seen are
    /// adopted if their document is connected.
    pub async fn hello(&self, frame: &FrameId) -> Result<(), CanopyError> {
        let mut frames = self.frames.write().await;
        match frames.get_mut(frame) {
            Some(entry) => {
                if entry.state == FrameState::Active {
                    tracing::debug!(frame_id = %frame, "repeated hello");
                    return Ok(());
                }
                entry.state = FrameState::Active;
                entry.last_active = monotonic_millis();
                if let Some(waiter) = entry.hello.take() {
                    let _ = waiter.send(());
                }
            }
            None => {
                if !self.transport.is_connected(frame).await {
                    return Err(CanopyError::not_found(ItemKind::Frame, frame.as_str()));
                }
                frames.insert(
                    frame.clone(),
                    FrameEntry {
                        state: FrameState::Active,
                        last_active: monotonic_millis(),
                        hello: None,
                    },
                );
            }
        }
        tracing::info!(frame_id = %frame, "frame active");
        Ok(())
    }

    /// Removes a frame whose native window is gone and has its host close
    /// every workspace, which publishes the closing events. Returns whether
    /// the frame was known.
    pub async fn disappeared(&self, frame: &FrameId) -> bool {
        let Some(entry) = self.frames.write().await.remove(frame) else {
            return false;
        };
        tracing::info!(frame_id = %frame, state = ?entry.state, "frame disappeared");
        if let Err(err) = self.transport.call(frame, FrameRequest::Shutdown).await {
            tracing::debug!(frame_id = %frame, error = %err, "frame host did not shut down cleanly");
        }
        self.transport.disconnect(frame).await;
        true
    }

    /// Follows the native event stream and tears down frames whose window
    /// was removed.
    pub fn watch(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let mut events = self.native.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(NativeEvent::WindowRemoved(id)) => {
                        coordinator.disappeared(&FrameId::from(id)).await;
                    }
                    Ok(NativeEvent::WindowAdded(_)) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "native event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Shuts every frame down, then closes its window.
    pub async fn close_all(&self) {
        let frames: Vec<FrameId> = self.frames.read().await.keys().cloned().collect();
        for frame in frames {
            self.disappeared(&frame).await;
            if let Err(err) = self.native.close(frame.as_str()).await {
                tracing::debug!(frame_id = %frame, error = %err, "frame window already gone");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FrameHost;
    use crate::native::HeadlessWindows;
    use crate::transport::LocalTransport;
    use async_trait::async_trait;
    use canopy_common::{EventAction, EventBus, EventType, ItemId, Size};
    use canopy_protocol::requests::{FrameSelector, NewFrame};
    use canopy_protocol::Operation;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Starts hosts and reports their ids instead of saying hello itself.
    struct ReportingLauncher {
        native: Arc<dyn NativeWindows>,
        transport: Arc<dyn Transport>,
        launched: mpsc::UnboundedSender<FrameId>,
    }

    #[async_trait]
    impl FrameLauncher for ReportingLauncher {
        async fn launch(&self, frame: FrameId, size: Size) -> Result<(), CanopyError> {
            FrameHost::start(
                frame.clone(),
                size,
                Arc::clone(&self.native),
                Arc::clone(&self.transport),
                Duration::from_secs(5),
            )
            .await;
            let _ = self.launched.send(frame);
            Ok(())
        }
    }

    struct Fixture {
        coordinator: Arc<FrameCoordinator>,
        native: Arc<HeadlessWindows>,
        transport: Arc<LocalTransport>,
    }

    /// With `answer` set, every launched frame says hello right away.
    fn fixture(answer: bool) -> Fixture {
        let native = Arc::new(HeadlessWindows::new());
        let transport = Arc::new(LocalTransport::new(
            EventBus::new(256),
            Duration::from_secs(10),
        ));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let launcher = Arc::new(ReportingLauncher {
            native: native.clone(),
            transport: transport.clone(),
            launched: tx,
        });
        let coordinator = Arc::new(FrameCoordinator::new(
            native.clone(),
            transport.clone(),
            launcher,
            FramesConfig::default(),
        ));
        let greeter = Arc::clone(&coordinator);
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if answer {
                    greeter.hello(&frame).await.unwrap();
                }
            }
        });
        Fixture {
            coordinator,
            native,
            transport,
        }
    }

    #[tokio::test]
    async fn default_selector_opens_then_reuses_a_frame() {
        let f = fixture(true);
        let first = f.coordinator.resolve(None).await.unwrap();
        assert_eq!(f.coordinator.state(&first).await, Some(FrameState::Active));
        let second = f.coordinator.resolve(None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(f.native.list().await.len(), 1);
    }

    #[tokio::test]
    async fn default_selector_prefers_most_recently_active() {
        let f = fixture(true);
        let a = f.coordinator.open_frame(None).await.unwrap();
        let b = f.coordinator.open_frame(None).await.unwrap();
        f.coordinator.touch(&a).await;
        assert_eq!(f.coordinator.resolve(None).await.unwrap(), a);
        f.coordinator.touch(&b).await;
        assert_eq!(f.coordinator.resolve(None).await.unwrap(), b);
    }

    #[tokio::test]
    async fn selectors_with_two_keys_are_rejected() {
        let f = fixture(true);
        let selectors = [
            FrameSelector {
                frame_id: Some(FrameId::from("a")),
                item_id: Some(ItemId::from("b")),
                new_frame: None,
            },
            FrameSelector {
                frame_id: Some(FrameId::from("a")),
                item_id: None,
                new_frame: Some(NewFrame::Flag(false)),
            },
            FrameSelector {
                frame_id: None,
                item_id: Some(ItemId::from("b")),
                new_frame: Some(NewFrame::Flag(true)),
            },
        ];
        for selector in selectors {
            let err = f.coordinator.resolve(Some(&selector)).await.unwrap_err();
            assert!(matches!(err, CanopyError::OverSpecified(ref keys) if keys.len() == 2));
        }
        assert!(f.native.list().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_frame_id_is_not_found() {
        let f = fixture(true);
        let selector = FrameSelector::by_frame(FrameId::from("nowhere"));
        let err = f.coordinator.resolve(Some(&selector)).await.unwrap_err();
        assert_eq!(err, CanopyError::not_found(ItemKind::Frame, "nowhere"));
    }

    #[tokio::test]
    async fn item_selector_finds_hosting_frame() {
        let f = fixture(true);
        let a = f.coordinator.open_frame(None).await.unwrap();
        let b = f.coordinator.open_frame(None).await.unwrap();
        f.coordinator.touch(&a).await;

        let payload = json!({});
        let raw = f
            .transport
            .call(
                &b,
                FrameRequest::Operation {
                    operation: Operation::CreateWorkspace,
                    payload,
                },
            )
            .await
            .unwrap();
        let workspace = ItemId::from(raw["id"].as_str().unwrap());

        let selector = FrameSelector::by_item(workspace);
        assert_eq!(f.coordinator.resolve(Some(&selector)).await.unwrap(), b);

        let missing = FrameSelector::by_item(ItemId::from("ghost"));
        let err = f.coordinator.resolve(Some(&missing)).await.unwrap_err();
        assert_eq!(err, CanopyError::not_found(ItemKind::Item, "ghost"));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_frame_times_out_and_is_cleaned_up() {
        let f = fixture(false);
        let err = f
            .coordinator
            .resolve(Some(&FrameSelector::new_frame()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CanopyError::Timeout {
                what: "hello from frame native-1".into(),
                after_ms: 15_000
            }
        );
        assert!(f.coordinator.active_frames().await.is_empty());
        assert!(!f.coordinator.is_frame("native-1").await);
        assert!(f.native.list().await.is_empty());
        assert!(!f.transport.is_connected(&FrameId::from("native-1")).await);
    }

    #[tokio::test]
    async fn hello_from_unknown_disconnected_frame_is_rejected() {
        let f = fixture(true);
        let err = f.coordinator.hello(&FrameId::from("stray")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn vanished_frame_window_cascades_to_workspace_close() {
        let f = fixture(true);
        let _watch = f.coordinator.watch();
        let mut events = f.transport.subscribe();
        let frame = f.coordinator.resolve(None).await.unwrap();
        f.transport
            .call(
                &frame,
                FrameRequest::Operation {
                    operation: Operation::CreateWorkspace,
                    payload: json!({}),
                },
            )
            .await
            .unwrap();

        f.native.vanish(frame.as_str()).await;

        let mut saw_workspace_closed = false;
        loop {
            let event = events.recv().await.unwrap();
            if event.is(EventType::Workspace, EventAction::Closed) {
                saw_workspace_closed = true;
            }
            if event.is(EventType::Frame, EventAction::Closed) {
                break;
            }
        }
        assert!(saw_workspace_closed);
        assert!(!f.coordinator.is_frame(frame.as_str()).await);
    }
}
