//! Client facades over a running platform.
//!
//! [`WorkspacesApi`] is the entry point. Workspaces and their boxes are
//! read from snapshots: a facade answers reads from the snapshot it was
//! built from and sends every mutation through the dispatcher. After a
//! mutation, call `refresh_reference` (or use the facade the mutation
//! returned) to see the new state.

mod api;
mod arena;
mod boxes;
mod bridge;
mod events;
mod frame;
mod locks;
mod workspace;

pub use api::{Layouts, WorkspacesApi};
pub use arena::WorkspaceTree;
pub use boxes::{BoxItem, BoxRef, Column, Group, Row, Window};
pub use bridge::Bridge;
pub use events::{EventFilter, Subscription};
pub use frame::Frame;
pub use locks::LockUpdate;
pub use workspace::Workspace;
