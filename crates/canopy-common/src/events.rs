use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::{FrameId, ItemId, WorkspaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    Frame,
    Workspace,
    Container,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventAction {
    Opened,
    Closing,
    Closed,
    Focus,
    Added,
    Loaded,
    Removed,
    ChildrenUpdate,
    ContainerChange,
    Maximized,
    Minimized,
    Normal,
    Selected,
    Hibernated,
    Resumed,
}

/// A structural or lifecycle event.
///
/// `payload` carries the summary of the affected entity; the owning frame
/// and workspace ids are always present at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub action: EventAction,
    pub frame_id: FrameId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(event_type: EventType, action: EventAction, frame_id: FrameId) -> Self {
        Self {
            event_type,
            action,
            frame_id,
            workspace_id: None,
            item_id: None,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_workspace(mut self, workspace_id: WorkspaceId) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }

    pub fn with_item(mut self, item_id: ItemId) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn is(&self, event_type: EventType, action: EventAction) -> bool {
        self.event_type == event_type && self.action == action
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        tracing::trace!(
            event_type = ?event.event_type,
            action = ?event.action,
            frame_id = %event.frame_id,
            "publishing event"
        );
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameId {
        FrameId::from("frame-1")
    }

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventType::Frame, EventAction::Opened, frame()));

        let event = rx.recv().await.unwrap();
        assert!(event.is(EventType::Frame, EventAction::Opened));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(
            Event::new(EventType::Workspace, EventAction::Selected, frame())
                .with_workspace(WorkspaceId::from("ws-1")),
        );

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1, e2);
        assert_eq!(e1.workspace_id, Some(WorkspaceId::from("ws-1")));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(Event::new(EventType::Frame, EventAction::Closed, frame()));
        assert_eq!(count, 0);
    }

    #[test]
    fn wire_shape_uses_type_and_action() {
        let event = Event::new(EventType::Window, EventAction::ChildrenUpdate, frame())
            .with_item(ItemId::from("w-1"))
            .with_payload(serde_json::json!({"appName": "notes"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "window");
        assert_eq!(json["action"], "childrenUpdate");
        assert_eq!(json["frameId"], "frame-1");
        assert_eq!(json["itemId"], "w-1");
        assert!(json.get("workspaceId").is_none());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let raw = r#"{"type":"window","action":"teleported","frameId":"f"}"#;
        assert!(serde_json::from_str::<Event>(raw).is_err());
    }
}
