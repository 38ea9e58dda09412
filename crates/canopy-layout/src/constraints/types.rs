//! Resolved size bounds and the defaults they start from.

use canopy_protocol::ConstraintsConfig;

pub const DEFAULT_MIN_SIZE: u32 = 20;
/// Rows need room for at least a minimal header strip across their children.
pub const ROW_MIN_WIDTH: u32 = 60;
pub const MAX_SIZE: u32 = 32767;
/// Tab header drawn once above every window chain.
pub const HEADER_HEIGHT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl Constraints {
    pub const fn with_min_width(min_width: u32) -> Self {
        Self {
            min_width,
            max_width: MAX_SIZE,
            min_height: DEFAULT_MIN_SIZE,
            max_height: MAX_SIZE,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_width <= self.max_width && self.min_height <= self.max_height
    }

    /// Tightest bounds satisfying both `self` and the explicit request.
    pub fn intersect(self, explicit: &ConstraintsConfig) -> Self {
        Self {
            min_width: explicit.min_width.map_or(self.min_width, |v| v.max(self.min_width)),
            max_width: explicit.max_width.map_or(self.max_width, |v| v.min(self.max_width)),
            min_height: explicit.min_height.map_or(self.min_height, |v| v.max(self.min_height)),
            max_height: explicit.max_height.map_or(self.max_height, |v| v.min(self.max_height)),
        }
    }

    /// Raises each max to at least its min so reported bounds never cross.
    pub fn clamped(self) -> Self {
        Self {
            max_width: self.max_width.max(self.min_width),
            max_height: self.max_height.max(self.min_height),
            ..self
        }
    }

    pub(crate) fn add_header(self) -> Self {
        Self {
            min_height: capped_sum(self.min_height, HEADER_HEIGHT),
            max_height: capped_sum(self.max_height, HEADER_HEIGHT),
            ..self
        }
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::with_min_width(DEFAULT_MIN_SIZE)
    }
}

pub(crate) fn capped_sum(a: u32, b: u32) -> u32 {
    a.saturating_add(b).min(MAX_SIZE)
}
