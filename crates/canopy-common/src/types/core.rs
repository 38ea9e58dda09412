use serde::{Deserialize, Serialize};
use std::fmt;

/// The four node types a workspace tree is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxType {
    Row,
    Column,
    Group,
    Window,
}

impl BoxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxType::Row => "row",
            BoxType::Column => "column",
            BoxType::Group => "group",
            BoxType::Window => "window",
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, BoxType::Window)
    }

    /// Whether `child` may be placed directly under a box of this type.
    /// Splits never nest in their own orientation and groups only stack windows.
    pub fn can_contain(&self, child: BoxType) -> bool {
        match self {
            BoxType::Row => child != BoxType::Row,
            BoxType::Column => child != BoxType::Column,
            BoxType::Group => child == BoxType::Window,
            BoxType::Window => false,
        }
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Position and size of a native window, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
