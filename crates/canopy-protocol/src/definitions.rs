use canopy_common::BoxType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::locks::{LockConfig, LockFlag};

/// Explicit size bounds a caller attaches to a box. Absent fields defer to
/// the box type's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConstraintsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
}

impl ConstraintsConfig {
    pub fn is_empty(&self) -> bool {
        self.min_width.is_none()
            && self.max_width.is_none()
            && self.min_height.is_none()
            && self.max_height.is_none()
    }

    fn slot(&mut self, key: &str) -> Option<&mut Option<u32>> {
        match key {
            "minWidth" => Some(&mut self.min_width),
            "maxWidth" => Some(&mut self.max_width),
            "minHeight" => Some(&mut self.min_height),
            "maxHeight" => Some(&mut self.max_height),
            _ => None,
        }
    }

    fn write_into(&self, map: &mut Map<String, Value>) {
        let pairs = [
            ("minWidth", self.min_width),
            ("maxWidth", self.max_width),
            ("minHeight", self.min_height),
            ("maxHeight", self.max_height),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::from(value));
            }
        }
    }
}

/// The flat `config` object of a definition: size constraints and lock
/// flags side by side. Any other key is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct DefinitionConfig {
    pub constraints: ConstraintsConfig,
    pub locks: LockConfig,
}

impl DefinitionConfig {
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.locks.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for DefinitionConfig {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut config = DefinitionConfig::default();
        for (key, value) in map {
            if let Some(slot) = config.constraints.slot(&key) {
                let number = value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| format!("`{key}` must be a non-negative integer"))?;
                *slot = Some(number);
                continue;
            }
            let flag: LockFlag = key
                .parse()
                .map_err(|_| format!("unknown config key `{key}`"))?;
            let enabled = value
                .as_bool()
                .ok_or_else(|| format!("`{key}` must be a boolean"))?;
            config.locks.set(flag, enabled);
        }
        Ok(config)
    }
}

impl From<DefinitionConfig> for Map<String, Value> {
    fn from(config: DefinitionConfig) -> Self {
        let mut map = Map::new();
        config.constraints.write_into(&mut map);
        for (flag, value) in config.locks.iter() {
            map.insert(flag.as_str().to_string(), Value::Bool(value));
        }
        map
    }
}

/// A box to be created: a container with nested children, or a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BoxDefinition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub box_type: Option<BoxType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoxDefinition>,
    #[serde(default, skip_serializing_if = "DefinitionConfig::is_empty")]
    pub config: DefinitionConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl BoxDefinition {
    pub fn window(app_name: impl Into<String>) -> Self {
        Self {
            box_type: Some(BoxType::Window),
            app_name: Some(app_name.into()),
            ..Self::default()
        }
    }

    pub fn container(box_type: BoxType, children: Vec<BoxDefinition>) -> Self {
        Self {
            box_type: Some(box_type),
            children,
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: DefinitionConfig) -> Self {
        self.config = config;
        self
    }

    /// The concrete type of this definition when placed under `parent`
    /// (`None` for the workspace root).
    ///
    /// An explicit type always wins. Otherwise a definition naming an app is
    /// a window, one whose children are all windows is a group, and a bare
    /// split alternates orientation with its parent.
    pub fn resolved_type(&self, parent: Option<BoxType>) -> BoxType {
        if let Some(box_type) = self.box_type {
            return box_type;
        }
        if self.app_name.is_some() || parent == Some(BoxType::Group) {
            return BoxType::Window;
        }
        if !self.children.is_empty() && self.children.iter().all(BoxDefinition::names_window) {
            return BoxType::Group;
        }
        match parent {
            Some(BoxType::Row) => BoxType::Column,
            _ => BoxType::Row,
        }
    }

    fn names_window(&self) -> bool {
        match self.box_type {
            Some(box_type) => box_type == BoxType::Window,
            None => self.app_name.is_some(),
        }
    }

    /// Windows named anywhere in this definition, depth first.
    pub fn window_count(&self) -> usize {
        if self.names_window() {
            return 1;
        }
        self.children.iter().map(BoxDefinition::window_count).sum()
    }
}
