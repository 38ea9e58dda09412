use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::BoxType;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// What kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Frame,
    Workspace,
    Container,
    Window,
    Item,
    Layout,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Frame => "frame",
            ItemKind::Workspace => "workspace",
            ItemKind::Container => "container",
            ItemKind::Window => "window",
            ItemKind::Item => "item",
            ItemKind::Layout => "layout",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by workspace operations.
///
/// Errors are serializable so a frame's rejection reaches the platform
/// caller unchanged. None of them are retried by the core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum CanopyError {
    #[error("validation failed for {operation}: {reason}")]
    Validation { operation: String, reason: String },

    #[error("cannot add a {child} to a {parent}")]
    InvalidChildType { parent: String, child: BoxType },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("over-specified selector: only one of {0:?} may be set")]
    OverSpecified(Vec<String>),

    #[error("{kind} not found: {id}")]
    NotFound { kind: ItemKind, id: String },

    #[error("timed out waiting for {what} after {after_ms}ms")]
    Timeout { what: String, after_ms: u64 },

    #[error("native window could not be opened: {0}")]
    PopupBlocked(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),
}

impl CanopyError {
    pub fn validation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CanopyError::Validation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: ItemKind, id: impl Into<String>) -> Self {
        CanopyError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn timeout(what: impl Into<String>, after_ms: u64) -> Self {
        CanopyError::Timeout {
            what: what.into(),
            after_ms,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CanopyError::NotFound { .. })
    }
}

impl From<ConfigError> for CanopyError {
    fn from(err: ConfigError) -> Self {
        CanopyError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("frames.hello_timeout_ms".into());
        assert_eq!(
            err.to_string(),
            "config validation error: frames.hello_timeout_ms"
        );
    }

    #[test]
    fn validation_error_names_operation_and_reason() {
        let err = CanopyError::validation("addWindow", "missing field `appName`");
        assert_eq!(
            err.to_string(),
            "validation failed for addWindow: missing field `appName`"
        );
    }

    #[test]
    fn invalid_child_type_display() {
        let err = CanopyError::InvalidChildType {
            parent: "row".into(),
            child: BoxType::Row,
        };
        assert_eq!(err.to_string(), "cannot add a row to a row");
    }

    #[test]
    fn not_found_display() {
        let err = CanopyError::not_found(ItemKind::Frame, "f-1");
        assert_eq!(err.to_string(), "frame not found: f-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn timeout_display() {
        let err = CanopyError::timeout("frame hello", 15000);
        assert_eq!(
            err.to_string(),
            "timed out waiting for frame hello after 15000ms"
        );
    }

    #[test]
    fn over_specified_lists_keys() {
        let err = CanopyError::OverSpecified(vec!["frameId".into(), "itemId".into()]);
        assert!(err.to_string().contains("frameId"));
        assert!(err.to_string().contains("itemId"));
    }

    #[test]
    fn canopy_error_from_config() {
        let err: CanopyError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, CanopyError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn errors_survive_serialization() {
        let err = CanopyError::InvalidChildType {
            parent: "group".into(),
            child: BoxType::Column,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"kind\":\"invalidChildType\""));
        let back: CanopyError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);

        let err = CanopyError::PopupBlocked("frame-2".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "popupBlocked");
        assert_eq!(json["detail"], "frame-2");
    }
}
