use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use canopy_common::{CanopyError, FrameId, Size};
use canopy_protocol::Operation;
use serde_json::json;

use crate::dispatch::PlatformHandle;
use crate::host::FrameHost;
use crate::native::NativeWindows;
use crate::transport::Transport;

/// Starts the document inside a freshly opened frame window. A launched
/// frame announces itself with `frameHello` once it can take requests.
#[async_trait]
pub trait FrameLauncher: Send + Sync {
    async fn launch(&self, frame: FrameId, size: Size) -> Result<(), CanopyError>;
}

/// Runs frames as in-process [`FrameHost`] tasks.
pub struct LocalLauncher {
    native: Arc<dyn NativeWindows>,
    transport: Arc<dyn Transport>,
    platform: PlatformHandle,
    load_timeout: Duration,
}

impl LocalLauncher {
    pub fn new(
        native: Arc<dyn NativeWindows>,
        transport: Arc<dyn Transport>,
        platform: PlatformHandle,
        load_timeout: Duration,
    ) -> Self {
        Self {
            native,
            transport,
            platform,
            load_timeout,
        }
    }
}

#[async_trait]
impl FrameLauncher for LocalLauncher {
    async fn launch(&self, frame: FrameId, size: Size) -> Result<(), CanopyError> {
        FrameHost::start(
            frame.clone(),
            size,
            Arc::clone(&self.native),
            Arc::clone(&self.transport),
            self.load_timeout,
        )
        .await;

        let platform = self.platform.clone();
        tokio::spawn(async move {
            let hello = json!({ "windowId": frame });
            if let Err(err) = platform.call(Operation::FrameHello.as_str(), hello).await {
                tracing::warn!(frame_id = %frame, error = %err, "frame hello was rejected");
            }
        });
        Ok(())
    }
}
