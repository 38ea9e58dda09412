//! Filtered views of the platform event stream.

use canopy_common::{Event, EventAction, EventType, FrameId, WorkspaceId};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Which events a [`Subscription`] yields. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub event_type: Option<EventType>,
    pub action: Option<EventAction>,
    pub frame_id: Option<FrameId>,
    pub workspace_id: Option<WorkspaceId>,
}

impl EventFilter {
    pub fn new(event_type: EventType, action: EventAction) -> Self {
        Self {
            event_type: Some(event_type),
            action: Some(action),
            ..Self::default()
        }
    }

    pub fn in_frame(mut self, frame_id: FrameId) -> Self {
        self.frame_id = Some(frame_id);
        self
    }

    pub fn in_workspace(mut self, workspace_id: WorkspaceId) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.event_type.map_or(true, |t| t == event.event_type)
            && self.action.map_or(true, |a| a == event.action)
            && self.frame_id.as_ref().map_or(true, |f| f == &event.frame_id)
            && self
                .workspace_id
                .as_ref()
                .map_or(true, |w| event.workspace_id.as_ref() == Some(w))
    }
}

pub struct Subscription {
    receiver: broadcast::Receiver<Event>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<Event>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next matching event, or `None` once the platform has stopped.
    /// Events dropped because this subscriber fell behind are skipped.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_common::EventBus;

    #[test]
    fn unset_fields_match_anything() {
        let event = Event::new(EventType::Window, EventAction::Added, FrameId::from("f"))
            .with_workspace(WorkspaceId::from("ws-1"));
        assert!(EventFilter::default().matches(&event));
        assert!(EventFilter::new(EventType::Window, EventAction::Added).matches(&event));
        assert!(!EventFilter::new(EventType::Window, EventAction::Removed).matches(&event));
        assert!(!EventFilter::default()
            .in_workspace(WorkspaceId::from("ws-2"))
            .matches(&event));
    }

    #[tokio::test]
    async fn subscription_skips_other_events() {
        let bus = EventBus::new(16);
        let mut sub = Subscription::new(
            bus.subscribe(),
            EventFilter::new(EventType::Workspace, EventAction::Hibernated),
        );
        let frame = FrameId::from("f");
        bus.publish(Event::new(EventType::Workspace, EventAction::Opened, frame.clone()));
        bus.publish(
            Event::new(EventType::Workspace, EventAction::Hibernated, frame)
                .with_workspace(WorkspaceId::from("ws-1")),
        );
        let event = sub.next().await.unwrap();
        assert_eq!(event.workspace_id, Some(WorkspaceId::from("ws-1")));

        drop(bus);
        assert!(sub.next().await.is_none());
    }
}
