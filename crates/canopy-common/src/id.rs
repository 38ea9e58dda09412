use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Short id used to correlate a dispatched command with its log lines.
pub fn new_command_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(new_id())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Id of a frame; identical to the id of its hosting native window.
    FrameId
);
string_id!(WorkspaceId);
string_id!(
    /// Id of any addressable item: a box, a workspace or a frame.
    ItemId
);

impl From<&WorkspaceId> for ItemId {
    fn from(value: &WorkspaceId) -> Self {
        ItemId(value.0.clone())
    }
}

impl From<&FrameId> for ItemId {
    fn from(value: &FrameId) -> Self {
        ItemId(value.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn command_id_is_short_hex() {
        let cid = new_command_id();
        assert_eq!(cid.len(), 8);
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(FrameId::new(), FrameId::new());
        assert_ne!(ItemId::new(), ItemId::new());
    }

    #[test]
    fn id_display_matches_inner() {
        let id = WorkspaceId::from("ws-1");
        assert_eq!(id.to_string(), "ws-1");
        assert_eq!(id.as_str(), "ws-1");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ItemId::from("box-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"box-7\"");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn workspace_and_frame_ids_convert_to_item_ids() {
        let ws = WorkspaceId::from("ws-1");
        let frame = FrameId::from("frame-1");
        assert_eq!(ItemId::from(&ws).as_str(), "ws-1");
        assert_eq!(ItemId::from(&frame).as_str(), "frame-1");
    }
}
