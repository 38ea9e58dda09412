mod apply;
mod inheritance;

pub use apply::*;
pub use inheritance::*;
