//! A workspace: one box tree plus its selection, hibernation and persisted
//! layout state.

mod operations;
mod persist;
mod snapshot;
mod types;

pub use snapshot::Placement;
pub use types::*;
