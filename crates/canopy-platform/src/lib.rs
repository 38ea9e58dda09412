//! Canopy platform runtime.
//!
//! Runs frames, routes wire operations into them and watches their
//! lifecycle:
//!
//! - [`native`]: the native window service contract and a headless backend
//! - [`transport`]: request/response and event plumbing between platform and frames
//! - [`host`]: the per-frame handler owning a frame's layout model
//! - [`coordinator`]: frame registry, hello handshake and frame selection
//! - [`dispatch`]: the operation dispatcher and its cloneable handle
//! - [`store`]: saved layout documents
//! - [`hibernation`]: idle and maximum-active hibernation policies

pub mod coordinator;
pub mod dispatch;
pub mod hibernation;
pub mod host;
pub mod native;
pub mod store;
pub mod transport;

mod platform;

pub use coordinator::{FrameCoordinator, FrameLauncher, FrameState, LocalLauncher};
pub use dispatch::{Dispatcher, PlatformHandle};
pub use hibernation::HibernationWatcher;
pub use native::{HeadlessWindows, NativeEvent, NativeWindow, NativeWindows, OpenWindow, WindowRole};
pub use platform::Platform;
pub use store::LayoutStore;
pub use transport::{FrameRequest, LocalTransport, Transport};
