//! In-process layout model of a frame.
//!
//! A frame owns workspaces; a workspace owns an arena [`BoxTree`] of rows,
//! columns, groups and windows. Size constraints are aggregated bottom-up by
//! [`constraints`], lock flags are resolved by inheritance in [`locking`] and
//! pixel sizes are derived by [`geometry`]. Nothing here performs I/O:
//! mutations queue [`canopy_common::Event`]s on the owning [`FrameModel`]
//! for the host to publish.

pub mod constraints;
pub mod frame;
pub mod geometry;
pub mod locking;
pub mod tree;
pub mod workspace;

pub use constraints::Constraints;
pub use frame::FrameModel;
pub use locking::LockRequest;
pub use tree::{BoxTree, Node, NodeKind, WindowState};
pub use workspace::{AddOutcome, Workspace, WorkspaceOptions};
