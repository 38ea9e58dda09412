//! Contract of the native window service.
//!
//! Frames and application windows are both native windows; the platform
//! opens, moves and closes them through [`NativeWindows`] and learns about
//! windows appearing or vanishing from its event stream.

mod headless;

pub use headless::HeadlessWindows;

use async_trait::async_trait;
use canopy_common::{Bounds, CanopyError};
use canopy_layout::WindowState;
use canopy_protocol::BoxDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

pub type Result<T> = std::result::Result<T, CanopyError>;

/// What a native window hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowRole {
    /// A frame document hosting workspaces.
    Frame,
    /// An application window placed inside a workspace, or ejected from one.
    App,
}

/// Parameters for opening a native window.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenWindow {
    pub role: WindowRole,
    pub app_name: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub context: Option<Value>,
    pub bounds: Option<Bounds>,
}

impl OpenWindow {
    pub fn frame(bounds: Bounds) -> Self {
        Self {
            role: WindowRole::Frame,
            app_name: None,
            url: None,
            title: None,
            context: None,
            bounds: Some(bounds),
        }
    }

    pub fn app(window: &WindowState) -> Self {
        Self {
            role: WindowRole::App,
            app_name: Some(window.app_name.clone()),
            url: window.url.clone(),
            title: window.title.clone(),
            context: window.context.clone(),
            bounds: None,
        }
    }

    /// A standalone window for a definition taken out of a workspace.
    pub fn standalone(definition: &BoxDefinition) -> Self {
        Self {
            role: WindowRole::App,
            app_name: definition.app_name.clone(),
            url: definition.url.clone(),
            title: definition.title.clone(),
            context: definition.context.clone(),
            bounds: None,
        }
    }
}

/// A window the service currently knows about.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeWindow {
    pub id: String,
    pub role: WindowRole,
    pub app_name: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub bounds: Bounds,
    pub context: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    WindowAdded(String),
    WindowRemoved(String),
}

/// Native window management.
#[async_trait]
pub trait NativeWindows: Send + Sync {
    /// Opens a window and returns its id. Fails with
    /// [`CanopyError::PopupBlocked`] when the window could not be created.
    async fn open(&self, request: OpenWindow) -> Result<String>;

    async fn close(&self, id: &str) -> Result<()>;

    async fn focus(&self, id: &str) -> Result<()>;

    async fn set_bounds(&self, id: &str, bounds: Bounds) -> Result<()>;

    async fn find(&self, id: &str) -> Option<NativeWindow>;

    async fn list(&self) -> Vec<NativeWindow>;

    async fn context(&self, id: &str) -> Result<Value>;

    async fn set_context(&self, id: &str, context: Value) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<NativeEvent>;
}
