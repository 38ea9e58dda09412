use std::sync::Arc;
use std::time::Duration;

use canopy_common::{CanopyError, EventBus};
use canopy_config::CanopyConfig;
use tokio::task::JoinHandle;

use crate::coordinator::{FrameCoordinator, LocalLauncher};
use crate::dispatch::{serve, Dispatcher, PlatformHandle};
use crate::hibernation::HibernationWatcher;
use crate::native::NativeWindows;
use crate::store::LayoutStore;
use crate::transport::{LocalTransport, Transport};

const EVENT_CAPACITY: usize = 1024;
const CALL_CAPACITY: usize = 256;

/// A running platform: coordinator, dispatcher, layout store and, when
/// configured, the hibernation watcher, all sharing one event bus.
pub struct Platform {
    handle: PlatformHandle,
    coordinator: Arc<FrameCoordinator>,
    layouts: LayoutStore,
    tasks: Vec<JoinHandle<()>>,
}

impl Platform {
    pub async fn start(
        config: &CanopyConfig,
        native: Arc<dyn NativeWindows>,
    ) -> Result<Self, CanopyError> {
        let frames = &config.frames;
        let events = EventBus::new(EVENT_CAPACITY);
        let transport: Arc<dyn Transport> = Arc::new(LocalTransport::new(
            events.clone(),
            Duration::from_millis(frames.request_timeout_ms),
        ));
        let (handle, inbox) = PlatformHandle::channel(CALL_CAPACITY, events.clone());

        let launcher = Arc::new(LocalLauncher::new(
            Arc::clone(&native),
            Arc::clone(&transport),
            handle.clone(),
            Duration::from_millis(frames.window_load_timeout_ms),
        ));
        let coordinator = Arc::new(FrameCoordinator::new(
            Arc::clone(&native),
            Arc::clone(&transport),
            launcher,
            frames.clone(),
        ));

        let layouts = LayoutStore::new();
        if let Some(dir) = config.layouts.resolved_directory() {
            let count = layouts.import_directory(&dir).await?;
            tracing::info!(dir = %dir.display(), count, "layouts loaded");
        }

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&coordinator),
            transport,
            native,
            layouts.clone(),
        ));
        let mut tasks = vec![coordinator.watch(), serve(dispatcher, inbox)];

        if config.hibernation.is_enabled() {
            let watcher = HibernationWatcher::new(handle.clone(), config.hibernation.clone());
            tasks.push(watcher.spawn(events.subscribe()));
            tracing::info!("hibernation watcher started");
        }

        tracing::info!("platform started");
        Ok(Self {
            handle,
            coordinator,
            layouts,
            tasks,
        })
    }

    pub fn handle(&self) -> PlatformHandle {
        self.handle.clone()
    }

    pub fn layouts(&self) -> &LayoutStore {
        &self.layouts
    }

    /// Closes every frame and stops the background tasks.
    pub async fn shutdown(self) {
        self.coordinator.close_all().await;
        for task in &self.tasks {
            task.abort();
        }
        tracing::info!("platform stopped");
    }
}
