//! The per-frame request handler.
//!
//! A `FrameHost` owns one [`FrameModel`] and serves the calls addressed to
//! its frame one at a time, so mutations to a frame never interleave.
//! After every call it publishes the events the model queued.

mod handlers;
mod loading;

use std::sync::Arc;
use std::time::Duration;

use canopy_common::{CanopyError, FrameId, Size};
use canopy_layout::FrameModel;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::native::NativeWindows;
use crate::transport::{FrameCall, FrameRequest, Transport};

const INBOX_CAPACITY: usize = 64;

pub struct FrameHost {
    model: FrameModel,
    native: Arc<dyn NativeWindows>,
    transport: Arc<dyn Transport>,
    load_timeout: Duration,
    receiver: mpsc::Receiver<FrameCall>,
}

impl FrameHost {
    /// Connects a new frame to `transport` and starts serving it.
    pub async fn start(
        frame: FrameId,
        size: Size,
        native: Arc<dyn NativeWindows>,
        transport: Arc<dyn Transport>,
        load_timeout: Duration,
    ) -> JoinHandle<()> {
        let (sender, receiver) = mpsc::channel(INBOX_CAPACITY);
        transport.connect(frame.clone(), sender).await;

        let mut host = Self {
            model: FrameModel::new(frame, size),
            native,
            transport,
            load_timeout,
            receiver,
        };
        host.model.emit_frame_opened();
        host.flush();
        tokio::spawn(host.run())
    }

    async fn run(mut self) {
        tracing::debug!(frame_id = %self.model.id(), "frame host running");
        while let Some(call) = self.receiver.recv().await {
            let shutdown = matches!(call.request, FrameRequest::Shutdown);
            let result = self.handle(call.request).await;
            self.flush();
            if call.respond_to.send(result).is_err() {
                tracing::debug!(frame_id = %self.model.id(), "caller went away before reply");
            }
            if shutdown {
                break;
            }
        }
        tracing::debug!(frame_id = %self.model.id(), "frame host stopped");
    }

    async fn handle(&mut self, request: FrameRequest) -> Result<Value, CanopyError> {
        match request {
            FrameRequest::Operation { operation, payload } => {
                self.handle_operation(operation, payload).await
            }
            FrameRequest::Locate { item_id } => Ok(Value::Bool(self.model.locate(&item_id).is_some())),
            FrameRequest::TakeWindow { item_id } => {
                let definition = self.model.take_window(&item_id)?;
                serde_json::to_value(definition).map_err(|e| CanopyError::Transport(e.to_string()))
            }
            FrameRequest::PlaceWindow {
                container_id,
                definition,
            } => {
                let outcome = self.model.add_box(&container_id, None, &definition)?;
                let window_id = self.load_added(&outcome.id).await?;
                Ok(serde_json::json!({ "itemId": outcome.id, "windowId": window_id }))
            }
            FrameRequest::Resize { size } => {
                self.model.set_size(size);
                Ok(Value::Null)
            }
            FrameRequest::Shutdown => {
                let removed = self.model.close_all();
                self.close_native(&removed).await;
                tracing::info!(frame_id = %self.model.id(), "frame closed");
                Ok(Value::Null)
            }
        }
    }

    fn flush(&mut self) {
        for event in self.model.take_events() {
            self.transport.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{HeadlessWindows, OpenWindow, WindowRole};
    use crate::transport::LocalTransport;
    use canopy_common::{Event, EventAction, EventBus, EventType, ItemId};
    use canopy_protocol::{
        AddItemResult, BoxDefinition, Operation, Request, Response, WorkspaceSnapshot,
    };
    use serde_json::json;
    use tokio::sync::broadcast;

    struct Harness {
        frame: FrameId,
        native: Arc<HeadlessWindows>,
        transport: Arc<LocalTransport>,
        events: broadcast::Receiver<Event>,
    }

    async fn harness_with(native: HeadlessWindows) -> Harness {
        let native = Arc::new(native);
        let transport = Arc::new(LocalTransport::new(
            EventBus::new(256),
            Duration::from_secs(10),
        ));
        let events = transport.subscribe();
        let frame = FrameId::from(
            native
                .open(OpenWindow::frame(Default::default()))
                .await
                .unwrap(),
        );
        FrameHost::start(
            frame.clone(),
            Size::new(1000, 800),
            native.clone(),
            transport.clone(),
            Duration::from_millis(500),
        )
        .await;
        Harness {
            frame,
            native,
            transport,
            events,
        }
    }

    async fn harness() -> Harness {
        harness_with(HeadlessWindows::new()).await
    }

    impl Harness {
        async fn call(&self, operation: Operation, payload: Value) -> Result<Response, CanopyError> {
            let payload = Request::decode(operation, payload)?.encode()?;
            let raw = self
                .transport
                .call(&self.frame, FrameRequest::Operation { operation, payload })
                .await?;
            Response::decode(operation, raw)
        }

        async fn create(&self, payload: Value) -> WorkspaceSnapshot {
            match self.call(Operation::CreateWorkspace, payload).await.unwrap() {
                Response::CreateWorkspace(snapshot) => snapshot,
                other => panic!("unexpected {other:?}"),
            }
        }

        async fn app_windows(&self) -> usize {
            let windows = self.native.list().await;
            windows.iter().filter(|w| w.role == WindowRole::App).count()
        }

        fn drain(&mut self) -> Vec<Event> {
            let mut events = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                events.push(event);
            }
            events
        }
    }

    fn trading() -> Value {
        json!({
            "children": [{
                "type": "row",
                "children": [
                    {"type": "window", "appName": "chart"},
                    {"type": "window", "appName": "blotter"}
                ]
            }],
            "config": {"title": "Trading"}
        })
    }

    #[tokio::test]
    async fn frame_opened_event_on_start() {
        let mut h = harness().await;
        let events = h.drain();
        assert!(events[0].is(EventType::Frame, EventAction::Opened));
    }

    #[tokio::test]
    async fn selected_workspace_windows_load_on_create() {
        let h = harness().await;
        let snapshot = h.create(trading()).await;
        let windows = snapshot.windows();
        assert_eq!(windows.len(), 2);
        for window in windows {
            let window_id = window.config.window_id.clone().unwrap();
            assert!(h.native.find(&window_id).await.is_some());
            assert_eq!(window.config.is_loaded, Some(true));
        }
    }

    #[tokio::test]
    async fn windows_of_unselected_workspace_stay_unloaded() {
        let h = harness().await;
        h.create(json!({})).await;
        let mut payload = trading();
        payload["isSelected"] = json!(false);
        let snapshot = h.create(payload).await;
        assert!(snapshot
            .windows()
            .iter()
            .all(|w| w.config.window_id.is_none()));
        assert_eq!(h.app_windows().await, 0);

        let chart = snapshot.windows()[0].id.clone();
        let response = h
            .call(Operation::ForceLoadWindow, json!({"itemId": chart}))
            .await
            .unwrap();
        let Response::ForceLoadWindow(result) = response else {
            panic!("unexpected response");
        };
        assert!(h.native.find(&result.window_id).await.is_some());
    }

    #[tokio::test]
    async fn add_window_returns_native_id() {
        let h = harness().await;
        let snapshot = h.create(trading()).await;
        let row = snapshot.children[0].id.clone();
        let response = h
            .call(
                Operation::AddWindow,
                json!({
                    "definition": {"appName": "news"},
                    "parentId": row,
                    "parentType": "row"
                }),
            )
            .await
            .unwrap();
        let Response::AddWindow(AddItemResult {
            window_id,
            constraints_applied,
            ..
        }) = response
        else {
            panic!("unexpected response");
        };
        assert!(constraints_applied);
        assert!(window_id.is_some());
    }

    #[tokio::test]
    async fn closing_a_window_closes_its_native_window() {
        let h = harness().await;
        let snapshot = h.create(trading()).await;
        let chart = snapshot.windows()[0].clone();
        let native_id = chart.config.window_id.clone().unwrap();

        h.call(Operation::CloseItem, json!({"itemId": chart.id}))
            .await
            .unwrap();
        assert!(h.native.find(&native_id).await.is_none());
    }

    #[tokio::test]
    async fn closing_last_workspace_closes_the_frame_window() {
        let h = harness().await;
        let snapshot = h.create(json!({})).await;
        h.call(
            Operation::CloseItem,
            json!({"itemId": ItemId::from(&snapshot.id)}),
        )
        .await
        .unwrap();
        let Response::GetFrameSummary(summary) = h
            .call(Operation::GetFrameSummary, json!({"itemId": h.frame.as_str()}))
            .await
            .unwrap()
        else {
            panic!("unexpected response");
        };
        assert_eq!(summary.workspace_count, 0);
        assert!(h.native.find(h.frame.as_str()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_window_load_times_out() {
        let h = harness_with(HeadlessWindows::new().with_load_delay(Duration::from_secs(2))).await;
        let mut payload = trading();
        payload["isSelected"] = json!(false);
        h.create(json!({})).await;
        let snapshot = h.create(payload).await;
        let chart = snapshot.windows()[0].id.clone();

        let err = h
            .call(Operation::ForceLoadWindow, json!({"itemId": chart}))
            .await
            .unwrap_err();
        assert!(matches!(err, CanopyError::Timeout { after_ms: 500, .. }));
    }

    async fn window_count(h: &Harness, workspace: &WorkspaceSnapshot) -> usize {
        let Response::GetWorkspaceSnapshot(current) = h
            .call(
                Operation::GetWorkspaceSnapshot,
                json!({"itemId": ItemId::from(&workspace.id)}),
            )
            .await
            .unwrap()
        else {
            panic!("unexpected response");
        };
        current.windows().len()
    }

    #[tokio::test(start_paused = true)]
    async fn add_window_that_never_loads_is_rolled_back() {
        let mut h = harness_with(HeadlessWindows::new().with_load_delay(Duration::from_secs(2))).await;
        let snapshot = h.create(json!({"children": [{"type": "row"}]})).await;
        let row = snapshot.children[0].id.clone();
        h.drain();

        let err = h
            .call(
                Operation::AddWindow,
                json!({
                    "definition": {"appName": "news"},
                    "parentId": row,
                    "parentType": "row"
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CanopyError::Timeout { after_ms: 500, .. }));
        assert_eq!(window_count(&h, &snapshot).await, 0);

        let events = h.drain();
        assert!(events.iter().any(|e| e.is(EventType::Window, EventAction::Added)));
        assert!(events.iter().any(|e| e.is(EventType::Window, EventAction::Removed)));
    }

    #[tokio::test(start_paused = true)]
    async fn placed_window_that_never_loads_is_not_kept() {
        let h = harness_with(HeadlessWindows::new().with_load_delay(Duration::from_secs(2))).await;
        let snapshot = h.create(json!({"children": [{"type": "row"}]})).await;

        let err = h
            .transport
            .call(
                &h.frame,
                FrameRequest::PlaceWindow {
                    container_id: snapshot.children[0].id.clone(),
                    definition: BoxDefinition::window("chart"),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CanopyError::Timeout { .. }));
        assert_eq!(window_count(&h, &snapshot).await, 0);
    }

    #[tokio::test]
    async fn eject_reuses_loaded_native_window() {
        let h = harness().await;
        let snapshot = h.create(trading()).await;
        let chart = snapshot.windows()[0].clone();
        let Response::EjectWindow(result) = h
            .call(Operation::EjectWindow, json!({"itemId": chart.id}))
            .await
            .unwrap()
        else {
            panic!("unexpected response");
        };
        assert_eq!(Some(result.window_id), chart.config.window_id);

        let Response::IsWindowInWorkspace(found) = h
            .call(
                Operation::IsWindowInWorkspace,
                json!({"windowId": chart.config.window_id.unwrap()}),
            )
            .await
            .unwrap()
        else {
            panic!("unexpected response");
        };
        assert!(!found.in_workspace);
    }

    #[tokio::test]
    async fn hibernation_closes_and_resume_reloads_on_select() {
        let h = harness().await;
        let snapshot = h.create(trading()).await;
        h.create(json!({})).await;
        let ws = snapshot.id.clone();

        h.call(Operation::HibernateWorkspace, json!({"workspaceId": ws}))
            .await
            .unwrap();
        assert_eq!(h.app_windows().await, 0);

        h.call(Operation::FocusItem, json!({"itemId": ItemId::from(&ws)}))
            .await
            .unwrap();
        assert_eq!(h.app_windows().await, 2);
    }

    #[tokio::test]
    async fn take_and_place_window_across_hosts() {
        let h = harness().await;
        let snapshot = h.create(trading()).await;
        let chart = snapshot.windows()[0].clone();

        let raw = h
            .transport
            .call(
                &h.frame,
                FrameRequest::TakeWindow {
                    item_id: chart.id.clone(),
                },
            )
            .await
            .unwrap();
        let definition: BoxDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(definition.window_id, chart.config.window_id);

        let placed = h
            .transport
            .call(
                &h.frame,
                FrameRequest::PlaceWindow {
                    container_id: snapshot.children[0].id.clone(),
                    definition,
                },
            )
            .await
            .unwrap();
        assert_eq!(placed["windowId"], json!(chart.config.window_id));
    }

    #[tokio::test]
    async fn shutdown_closes_everything_and_stops() {
        let mut h = harness().await;
        h.create(trading()).await;
        h.drain();

        h.transport
            .call(&h.frame, FrameRequest::Shutdown)
            .await
            .unwrap();
        assert_eq!(h.app_windows().await, 0);
        let events = h.drain();
        assert!(events
            .iter()
            .any(|e| e.is(EventType::Workspace, EventAction::Closed)));
        assert!(events.last().unwrap().is(EventType::Frame, EventAction::Closed));

        let err = h
            .transport
            .call(&h.frame, FrameRequest::Shutdown)
            .await
            .unwrap_err();
        assert!(matches!(err, CanopyError::Transport(_)));
    }
}
