//! Hibernation watcher.
//!
//! Listens to the event stream and hibernates workspaces under two optional
//! policies: an idle timer per workspace, and a cap on how many non-empty
//! workspaces stay live. Every hibernation goes through the platform's own
//! `hibernateWorkspace` operation, so frames refuse the same cases
//! (selected, already hibernated, empty) whichever path asked.

pub mod policy;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use canopy_common::{CanopyError, Event, EventAction, EventType, WorkspaceId};
use canopy_config::HibernationConfig;
use canopy_protocol::requests::{EmptyRequest, WorkspaceRequest};
use canopy_protocol::{Request, Response};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::dispatch::PlatformHandle;

pub use policy::excess_workspaces;

/// Events that count as activity in a workspace.
fn is_activity(event: &Event) -> bool {
    match event.event_type {
        EventType::Window => matches!(
            event.action,
            EventAction::Added | EventAction::Opened | EventAction::Loaded
        ),
        EventType::Workspace => {
            matches!(event.action, EventAction::Opened | EventAction::Selected)
        }
        _ => false,
    }
}

pub struct HibernationWatcher {
    platform: PlatformHandle,
    policy: HibernationConfig,
    timers: Mutex<HashMap<WorkspaceId, JoinHandle<()>>>,
    checking: AtomicBool,
}

impl HibernationWatcher {
    pub fn new(platform: PlatformHandle, policy: HibernationConfig) -> Arc<Self> {
        Arc::new(Self {
            platform,
            policy,
            timers: Mutex::new(HashMap::new()),
            checking: AtomicBool::new(false),
        })
    }

    /// Follows `events` until the stream closes.
    pub fn spawn(self: &Arc<Self>, mut events: broadcast::Receiver<Event>) -> JoinHandle<()> {
        let watcher = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => watcher.on_event(&event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "hibernation watcher lagged behind events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            watcher.cancel_all().await;
        })
    }

    async fn on_event(self: &Arc<Self>, event: &Event) {
        let Some(workspace) = event.workspace_id.clone() else {
            return;
        };
        if is_activity(event) {
            self.restart_timer(workspace).await;
            self.spawn_maximum_check();
        } else if event.event_type == EventType::Workspace
            && matches!(event.action, EventAction::Closed | EventAction::Hibernated)
        {
            self.cancel_timer(&workspace).await;
        }
    }

    async fn restart_timer(&self, workspace: WorkspaceId) {
        let Some(idle) = &self.policy.idle_workspaces else {
            return;
        };
        let delay = Duration::from_millis(idle.idle_ms_threshold);
        let platform = self.platform.clone();
        let id = workspace.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match hibernate(&platform, &id).await {
                Ok(()) => tracing::info!(workspace_id = %id, "idle workspace hibernated"),
                Err(err) => tracing::debug!(workspace_id = %id, error = %err, "idle hibernation refused"),
            }
        });
        if let Some(previous) = self.timers.lock().await.insert(workspace, timer) {
            previous.abort();
        }
    }

    async fn cancel_timer(&self, workspace: &WorkspaceId) {
        if let Some(timer) = self.timers.lock().await.remove(workspace) {
            timer.abort();
        }
    }

    async fn cancel_all(&self) {
        for (_, timer) in self.timers.lock().await.drain() {
            timer.abort();
        }
    }

    /// Number of pending idle timers.
    pub async fn pending_timers(&self) -> usize {
        self.timers.lock().await.len()
    }

    fn spawn_maximum_check(self: &Arc<Self>) {
        if self.policy.maximum_active_workspaces.is_none() {
            return;
        }
        let watcher = Arc::clone(self);
        tokio::spawn(async move {
            watcher.check_maximum().await;
        });
    }

    /// Hibernates the excess over the configured maximum. Runs at most once
    /// at a time; a call made while one is running returns `false` at once.
    pub async fn check_maximum(&self) -> bool {
        let Some(maximum) = &self.policy.maximum_active_workspaces else {
            return false;
        };
        if self
            .checking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        match self.platform.request(Request::GetAllWorkspacesSummaries(EmptyRequest {})).await {
            Ok(Response::GetAllWorkspacesSummaries(all)) => {
                for workspace in excess_workspaces(&all.summaries, maximum.threshold) {
                    match hibernate(&self.platform, &workspace).await {
                        Ok(()) => tracing::info!(
                            workspace_id = %workspace,
                            threshold = maximum.threshold,
                            "workspace hibernated over maximum"
                        ),
                        Err(err) => tracing::warn!(
                            workspace_id = %workspace,
                            error = %err,
                            "hibernation refused"
                        ),
                    }
                }
            }
            Ok(other) => {
                tracing::warn!(operation = %other.operation(), "unexpected reply to summaries request");
            }
            Err(err) => tracing::warn!(error = %err, "could not list workspaces"),
        }

        self.checking.store(false, Ordering::Release);
        true
    }
}

async fn hibernate(platform: &PlatformHandle, workspace: &WorkspaceId) -> Result<(), CanopyError> {
    platform
        .request(Request::HibernateWorkspace(WorkspaceRequest::new(workspace.clone())))
        .await
        .map(|_| ())
}
