use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use canopy_common::BoxType;
use serde::{Deserialize, Serialize};

/// A single lock flag. The set a node recognizes depends on its type;
/// see [`LockTarget::flags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockFlag {
    AllowDrop,
    AllowDropLeft,
    AllowDropTop,
    AllowDropRight,
    AllowDropBottom,
    AllowDropHeader,
    AllowExtract,
    AllowReorder,
    AllowWindowReorder,
    AllowSplitters,
    ShowCloseButton,
    ShowSaveButton,
    ShowMaximizeButton,
    ShowEjectButton,
    ShowEjectButtons,
    ShowAddWindowButton,
    ShowAddWindowButtons,
    ShowWindowCloseButtons,
    IsPinned,
}

impl LockFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockFlag::AllowDrop => "allowDrop",
            LockFlag::AllowDropLeft => "allowDropLeft",
            LockFlag::AllowDropTop => "allowDropTop",
            LockFlag::AllowDropRight => "allowDropRight",
            LockFlag::AllowDropBottom => "allowDropBottom",
            LockFlag::AllowDropHeader => "allowDropHeader",
            LockFlag::AllowExtract => "allowExtract",
            LockFlag::AllowReorder => "allowReorder",
            LockFlag::AllowWindowReorder => "allowWindowReorder",
            LockFlag::AllowSplitters => "allowSplitters",
            LockFlag::ShowCloseButton => "showCloseButton",
            LockFlag::ShowSaveButton => "showSaveButton",
            LockFlag::ShowMaximizeButton => "showMaximizeButton",
            LockFlag::ShowEjectButton => "showEjectButton",
            LockFlag::ShowEjectButtons => "showEjectButtons",
            LockFlag::ShowAddWindowButton => "showAddWindowButton",
            LockFlag::ShowAddWindowButtons => "showAddWindowButtons",
            LockFlag::ShowWindowCloseButtons => "showWindowCloseButtons",
            LockFlag::IsPinned => "isPinned",
        }
    }

    /// Value of the flag when nothing sets it. Permissions start granted;
    /// `isPinned` starts off.
    pub fn default_value(&self) -> bool {
        !matches!(self, LockFlag::IsPinned)
    }

    /// `isPinned` belongs to the box that sets it and is never read from
    /// an ancestor.
    pub fn is_inherited(&self) -> bool {
        !matches!(self, LockFlag::IsPinned)
    }

    /// Directional drop flags fall back to `allowDrop` when it is given
    /// and they are not.
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            LockFlag::AllowDropLeft
                | LockFlag::AllowDropTop
                | LockFlag::AllowDropRight
                | LockFlag::AllowDropBottom
                | LockFlag::AllowDropHeader
        )
    }
}

impl fmt::Display for LockFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| format!("unknown lock flag `{s}`"))
    }
}

/// The kind of node a lock applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockTarget {
    Workspace,
    Row,
    Column,
    Group,
    Window,
}

const WORKSPACE_FLAGS: &[LockFlag] = &[
    LockFlag::AllowDrop,
    LockFlag::AllowDropLeft,
    LockFlag::AllowDropTop,
    LockFlag::AllowDropRight,
    LockFlag::AllowDropBottom,
    LockFlag::AllowExtract,
    LockFlag::AllowWindowReorder,
    LockFlag::AllowSplitters,
    LockFlag::ShowCloseButton,
    LockFlag::ShowSaveButton,
    LockFlag::ShowAddWindowButtons,
    LockFlag::ShowEjectButtons,
    LockFlag::ShowWindowCloseButtons,
];

const SPLIT_FLAGS: &[LockFlag] = &[
    LockFlag::AllowDrop,
    LockFlag::AllowSplitters,
    LockFlag::IsPinned,
];

const GROUP_FLAGS: &[LockFlag] = &[
    LockFlag::AllowExtract,
    LockFlag::AllowReorder,
    LockFlag::ShowMaximizeButton,
    LockFlag::ShowEjectButton,
    LockFlag::ShowAddWindowButton,
    LockFlag::AllowDrop,
    LockFlag::AllowDropLeft,
    LockFlag::AllowDropRight,
    LockFlag::AllowDropTop,
    LockFlag::AllowDropBottom,
    LockFlag::AllowDropHeader,
];

const WINDOW_FLAGS: &[LockFlag] = &[
    LockFlag::AllowExtract,
    LockFlag::AllowReorder,
    LockFlag::ShowCloseButton,
];

impl LockTarget {
    pub fn flags(&self) -> &'static [LockFlag] {
        match self {
            LockTarget::Workspace => WORKSPACE_FLAGS,
            LockTarget::Row | LockTarget::Column => SPLIT_FLAGS,
            LockTarget::Group => GROUP_FLAGS,
            LockTarget::Window => WINDOW_FLAGS,
        }
    }

    pub fn recognizes(&self, flag: LockFlag) -> bool {
        self.flags().contains(&flag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockTarget::Workspace => "workspace",
            LockTarget::Row => "row",
            LockTarget::Column => "column",
            LockTarget::Group => "group",
            LockTarget::Window => "window",
        }
    }
}

impl From<BoxType> for LockTarget {
    fn from(box_type: BoxType) -> Self {
        match box_type {
            BoxType::Row => LockTarget::Row,
            BoxType::Column => LockTarget::Column,
            BoxType::Group => LockTarget::Group,
            BoxType::Window => LockTarget::Window,
        }
    }
}

impl fmt::Display for LockTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partial set of lock flags, keyed by flag name on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockConfig(BTreeMap<LockFlag, bool>);

impl LockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: LockFlag, value: bool) -> Self {
        self.0.insert(flag, value);
        self
    }

    pub fn get(&self, flag: LockFlag) -> Option<bool> {
        self.0.get(&flag).copied()
    }

    pub fn set(&mut self, flag: LockFlag, value: bool) {
        self.0.insert(flag, value);
    }

    pub fn remove(&mut self, flag: LockFlag) -> Option<bool> {
        self.0.remove(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LockFlag, bool)> + '_ {
        self.0.iter().map(|(flag, value)| (*flag, *value))
    }

    /// Every flag of `target` set to `false`.
    pub fn all_locked(target: LockTarget) -> Self {
        Self(target.flags().iter().map(|flag| (*flag, false)).collect())
    }

    /// Expands a partial config into a complete one for `target`.
    ///
    /// Omitted flags take their default, except directional drop flags, which
    /// take the value of `allowDrop` when it was given explicitly.
    pub fn filled_for(&self, target: LockTarget) -> Self {
        let drop = self.get(LockFlag::AllowDrop);
        let filled = target
            .flags()
            .iter()
            .map(|flag| {
                let value = match self.get(*flag) {
                    Some(value) => value,
                    None if flag.is_directional() => drop.unwrap_or(true),
                    None => flag.default_value(),
                };
                (*flag, value)
            })
            .collect();
        Self(filled)
    }

    /// Errors naming every flag `target` does not recognize.
    pub fn check_target(&self, target: LockTarget) -> Result<(), String> {
        let unknown: Vec<&str> = self
            .0
            .keys()
            .filter(|flag| !target.recognizes(**flag))
            .map(|flag| flag.as_str())
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "{} is not a {target} lock flag",
                unknown.join(", ")
            ))
        }
    }
}

impl FromIterator<(LockFlag, bool)> for LockConfig {
    fn from_iter<I: IntoIterator<Item = (LockFlag, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
