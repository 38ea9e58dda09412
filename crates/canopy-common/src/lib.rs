pub mod clock;
pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use clock::monotonic_millis;
pub use errors::{CanopyError, ConfigError, ItemKind};
pub use events::{Event, EventAction, EventBus, EventType};
pub use id::{new_command_id, new_id, FrameId, ItemId, WorkspaceId};
pub use types::{BoxType, Bounds, Size};

pub type Result<T> = std::result::Result<T, CanopyError>;
