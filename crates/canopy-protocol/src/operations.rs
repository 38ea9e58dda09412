use std::fmt;
use std::str::FromStr;

use canopy_common::CanopyError;
use serde::{Deserialize, Serialize};

/// Every operation the dispatcher accepts. Each maps 1:1 to a request and
/// a response decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    CreateWorkspace,
    OpenWorkspace,
    GetWorkspaceSnapshot,
    GetAllWorkspacesSummaries,
    GetFrameSnapshot,
    GetFrameSummary,
    GetAllFramesSummaries,
    AddWindow,
    AddContainer,
    MoveWindowTo,
    ResizeItem,
    MoveFrame,
    CloseItem,
    RestoreItem,
    MaximizeItem,
    FocusItem,
    SetItemTitle,
    ForceLoadWindow,
    EjectWindow,
    BundleWorkspace,
    HibernateWorkspace,
    ResumeWorkspace,
    LockWorkspace,
    LockContainer,
    LockWindow,
    SaveLayout,
    DeleteLayout,
    ImportLayout,
    ExportAllLayouts,
    GetAllLayoutsSummaries,
    IsWindowInWorkspace,
    FrameHello,
}

impl Operation {
    pub const ALL: [Operation; 32] = [
        Operation::CreateWorkspace,
        Operation::OpenWorkspace,
        Operation::GetWorkspaceSnapshot,
        Operation::GetAllWorkspacesSummaries,
        Operation::GetFrameSnapshot,
        Operation::GetFrameSummary,
        Operation::GetAllFramesSummaries,
        Operation::AddWindow,
        Operation::AddContainer,
        Operation::MoveWindowTo,
        Operation::ResizeItem,
        Operation::MoveFrame,
        Operation::CloseItem,
        Operation::RestoreItem,
        Operation::MaximizeItem,
        Operation::FocusItem,
        Operation::SetItemTitle,
        Operation::ForceLoadWindow,
        Operation::EjectWindow,
        Operation::BundleWorkspace,
        Operation::HibernateWorkspace,
        Operation::ResumeWorkspace,
        Operation::LockWorkspace,
        Operation::LockContainer,
        Operation::LockWindow,
        Operation::SaveLayout,
        Operation::DeleteLayout,
        Operation::ImportLayout,
        Operation::ExportAllLayouts,
        Operation::GetAllLayoutsSummaries,
        Operation::IsWindowInWorkspace,
        Operation::FrameHello,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateWorkspace => "createWorkspace",
            Operation::OpenWorkspace => "openWorkspace",
            Operation::GetWorkspaceSnapshot => "getWorkspaceSnapshot",
            Operation::GetAllWorkspacesSummaries => "getAllWorkspacesSummaries",
            Operation::GetFrameSnapshot => "getFrameSnapshot",
            Operation::GetFrameSummary => "getFrameSummary",
            Operation::GetAllFramesSummaries => "getAllFramesSummaries",
            Operation::AddWindow => "addWindow",
            Operation::AddContainer => "addContainer",
            Operation::MoveWindowTo => "moveWindowTo",
            Operation::ResizeItem => "resizeItem",
            Operation::MoveFrame => "moveFrame",
            Operation::CloseItem => "closeItem",
            Operation::RestoreItem => "restoreItem",
            Operation::MaximizeItem => "maximizeItem",
            Operation::FocusItem => "focusItem",
            Operation::SetItemTitle => "setItemTitle",
            Operation::ForceLoadWindow => "forceLoadWindow",
            Operation::EjectWindow => "ejectWindow",
            Operation::BundleWorkspace => "bundleWorkspace",
            Operation::HibernateWorkspace => "hibernateWorkspace",
            Operation::ResumeWorkspace => "resumeWorkspace",
            Operation::LockWorkspace => "lockWorkspace",
            Operation::LockContainer => "lockContainer",
            Operation::LockWindow => "lockWindow",
            Operation::SaveLayout => "saveLayout",
            Operation::DeleteLayout => "deleteLayout",
            Operation::ImportLayout => "importLayout",
            Operation::ExportAllLayouts => "exportAllLayouts",
            Operation::GetAllLayoutsSummaries => "getAllLayoutsSummaries",
            Operation::IsWindowInWorkspace => "isWindowInWorkspace",
            Operation::FrameHello => "frameHello",
        }
    }

    /// Operations served entirely by the platform, never forwarded into a frame.
    pub fn is_platform_only(&self) -> bool {
        matches!(
            self,
            Operation::GetAllFramesSummaries
                | Operation::DeleteLayout
                | Operation::ImportLayout
                | Operation::ExportAllLayouts
                | Operation::GetAllLayoutsSummaries
                | Operation::FrameHello
        )
    }

    /// Operations that act on a native window directly when their target is
    /// a frame rather than a tree node.
    pub fn short_circuits_frames(&self) -> bool {
        matches!(
            self,
            Operation::CloseItem
                | Operation::FocusItem
                | Operation::ResizeItem
                | Operation::MoveFrame
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CanopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| CanopyError::validation(s, "unrecognized operation"))
    }
}
