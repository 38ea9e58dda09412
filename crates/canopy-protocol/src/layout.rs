//! Persisted workspace layouts.
//!
//! A layout holds only explicit configuration. Runtime identity (`windowId`,
//! `positionIndex`, owning frame and workspace ids, maximize and focus
//! state) has no field here, so it cannot survive a save.

use canopy_common::BoxType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::definitions::{BoxDefinition, DefinitionConfig};
use crate::locks::LockTarget;

/// The only document type the store holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    #[default]
    Workspace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportMode {
    #[default]
    Replace,
    Merge,
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(format!("`{key}` must be a string")),
    }
}

/// Config of one saved box. Window leaves carry their app; every node may
/// carry constraints and lock flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct LayoutNodeConfig {
    pub app_name: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub context: Option<Value>,
    pub settings: DefinitionConfig,
}

impl TryFrom<Map<String, Value>> for LayoutNodeConfig {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            app_name: take_string(&mut map, "appName")?,
            url: take_string(&mut map, "url")?,
            title: take_string(&mut map, "title")?,
            context: map.remove("context").filter(|v| !v.is_null()),
            settings: DefinitionConfig::try_from(map)?,
        })
    }
}

impl From<LayoutNodeConfig> for Map<String, Value> {
    fn from(config: LayoutNodeConfig) -> Self {
        let mut map: Map<String, Value> = config.settings.into();
        if let Some(app_name) = config.app_name {
            map.insert("appName".into(), Value::String(app_name));
        }
        if let Some(url) = config.url {
            map.insert("url".into(), Value::String(url));
        }
        if let Some(title) = config.title {
            map.insert("title".into(), Value::String(title));
        }
        if let Some(context) = config.context {
            map.insert("context".into(), context);
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    #[serde(rename = "type")]
    pub box_type: BoxType,
    #[serde(default)]
    pub config: LayoutNodeConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn to_definition(&self) -> BoxDefinition {
        BoxDefinition {
            box_type: Some(self.box_type),
            children: self.children.iter().map(LayoutNode::to_definition).collect(),
            config: self.config.settings.clone(),
            app_name: self.config.app_name.clone(),
            window_id: None,
            title: self.config.title.clone(),
            url: self.config.url.clone(),
            context: self.config.context.clone(),
        }
    }

    fn validate(&self, parent: Option<BoxType>) -> Result<(), String> {
        if let Some(parent) = parent {
            if !parent.can_contain(self.box_type) {
                return Err(format!("a {} cannot hold a {}", parent, self.box_type));
            }
        }
        self.config
            .settings
            .locks
            .check_target(LockTarget::from(self.box_type))?;
        match self.box_type {
            BoxType::Window => {
                if self.config.app_name.as_deref().map_or(true, str::is_empty) {
                    return Err("window node without appName".into());
                }
                if !self.children.is_empty() {
                    return Err("window node with children".into());
                }
            }
            container => {
                for child in &self.children {
                    child.validate(Some(container))?;
                }
            }
        }
        Ok(())
    }
}

/// Workspace-level config of a saved layout: its title plus workspace lock flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct WorkspaceLayoutConfig {
    pub title: Option<String>,
    pub settings: DefinitionConfig,
}

impl TryFrom<Map<String, Value>> for WorkspaceLayoutConfig {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            title: take_string(&mut map, "title")?,
            settings: DefinitionConfig::try_from(map)?,
        })
    }
}

impl From<WorkspaceLayoutConfig> for Map<String, Value> {
    fn from(config: WorkspaceLayoutConfig) -> Self {
        let mut map: Map<String, Value> = config.settings.into();
        if let Some(title) = config.title {
            map.insert("title".into(), Value::String(title));
        }
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLayoutState {
    #[serde(default)]
    pub children: Vec<LayoutNode>,
    #[serde(default)]
    pub config: WorkspaceLayoutConfig,
    #[serde(default)]
    pub context: Value,
}

impl WorkspaceLayoutState {
    pub fn to_definitions(&self) -> Vec<BoxDefinition> {
        self.children.iter().map(LayoutNode::to_definition).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutComponent {
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    pub state: WorkspaceLayoutState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLayout {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: LayoutKind,
    #[serde(default)]
    pub metadata: Value,
    pub components: Vec<LayoutComponent>,
}

impl WorkspaceLayout {
    pub fn new(name: impl Into<String>, state: WorkspaceLayoutState, metadata: Value) -> Self {
        Self {
            name: name.into(),
            kind: LayoutKind::Workspace,
            metadata,
            components: vec![LayoutComponent {
                kind: LayoutKind::Workspace,
                state,
            }],
        }
    }

    pub fn state(&self) -> Option<&WorkspaceLayoutState> {
        self.components.first().map(|component| &component.state)
    }

    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            name: self.name.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Structural checks a store applies before accepting a document.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("layout name must not be empty".into());
        }
        if self.components.len() != 1 {
            return Err(format!(
                "layout `{}` must have exactly one component, found {}",
                self.name,
                self.components.len()
            ));
        }
        let state = &self.components[0].state;
        state
            .config
            .settings
            .locks
            .check_target(LockTarget::Workspace)?;
        if !state.config.settings.constraints.is_empty() {
            return Err("workspace config does not take size constraints".into());
        }
        for child in &state.children {
            child.validate(None)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub name: String,
    #[serde(default)]
    pub metadata: Value,
}
