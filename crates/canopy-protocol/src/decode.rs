//! Decoder registry.
//!
//! Every value crossing a frame boundary goes through [`decode`]: serde
//! checks the shape, then [`WireMessage::check`] applies the rules a type
//! system cannot express. Either failure names the operation.

use canopy_common::CanopyError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::layout::WorkspaceLayout;
use crate::operations::Operation;
use crate::requests::*;
use crate::responses::*;
use crate::snapshots::{FrameSnapshot, FrameSummary, WorkspaceSnapshot};

/// A payload with a registered decoder.
pub trait WireMessage: Serialize + DeserializeOwned {
    /// Semantic checks run after a successful structural decode.
    fn check(&self, _operation: Operation) -> Result<(), CanopyError> {
        Ok(())
    }
}

pub fn decode<T: WireMessage>(operation: Operation, value: Value) -> Result<T, CanopyError> {
    let value = match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    let message: T = serde_json::from_value(value)
        .map_err(|e| CanopyError::validation(operation.as_str(), e.to_string()))?;
    message.check(operation)?;
    Ok(message)
}

pub fn encode<T: Serialize>(operation: Operation, message: &T) -> Result<Value, CanopyError> {
    serde_json::to_value(message)
        .map_err(|e| CanopyError::validation(operation.as_str(), e.to_string()))
}

macro_rules! registry {
    ($($op:ident => $request:ty, $response:ty;)*) => {
        /// A decoded request, one variant per operation.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Request {
            $($op($request),)*
        }

        /// A decoded result, one variant per operation.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Response {
            $($op($response),)*
        }

        impl Request {
            pub fn decode(operation: Operation, value: Value) -> Result<Self, CanopyError> {
                match operation {
                    $(Operation::$op => decode::<$request>(operation, value).map(Request::$op),)*
                }
            }

            pub fn operation(&self) -> Operation {
                match self {
                    $(Request::$op(_) => Operation::$op,)*
                }
            }

            pub fn encode(&self) -> Result<Value, CanopyError> {
                match self {
                    $(Request::$op(message) => encode(Operation::$op, message),)*
                }
            }
        }

        impl Response {
            pub fn decode(operation: Operation, value: Value) -> Result<Self, CanopyError> {
                match operation {
                    $(Operation::$op => decode::<$response>(operation, value).map(Response::$op),)*
                }
            }

            pub fn operation(&self) -> Operation {
                match self {
                    $(Response::$op(_) => Operation::$op,)*
                }
            }

            pub fn encode(&self) -> Result<Value, CanopyError> {
                match self {
                    $(Response::$op(message) => encode(Operation::$op, message),)*
                }
            }
        }
    };
}

registry! {
    CreateWorkspace => CreateWorkspaceRequest, WorkspaceSnapshot;
    OpenWorkspace => OpenWorkspaceRequest, WorkspaceSnapshot;
    GetWorkspaceSnapshot => ItemRequest, WorkspaceSnapshot;
    GetAllWorkspacesSummaries => EmptyRequest, WorkspaceSummaries;
    GetFrameSnapshot => ItemRequest, FrameSnapshot;
    GetFrameSummary => ItemRequest, FrameSummary;
    GetAllFramesSummaries => EmptyRequest, FrameSummaries;
    AddWindow => AddWindowRequest, AddItemResult;
    AddContainer => AddContainerRequest, AddItemResult;
    MoveWindowTo => MoveWindowToRequest, Empty;
    ResizeItem => ResizeItemRequest, Empty;
    MoveFrame => MoveFrameRequest, Empty;
    CloseItem => ItemRequest, Empty;
    RestoreItem => ItemRequest, Empty;
    MaximizeItem => ItemRequest, Empty;
    FocusItem => ItemRequest, Empty;
    SetItemTitle => SetItemTitleRequest, Empty;
    ForceLoadWindow => ItemRequest, WindowIdResult;
    EjectWindow => ItemRequest, WindowIdResult;
    BundleWorkspace => BundleWorkspaceRequest, Empty;
    HibernateWorkspace => WorkspaceRequest, Empty;
    ResumeWorkspace => WorkspaceRequest, Empty;
    LockWorkspace => LockWorkspaceRequest, Empty;
    LockContainer => LockContainerRequest, Empty;
    LockWindow => LockWindowRequest, Empty;
    SaveLayout => SaveLayoutRequest, WorkspaceLayout;
    DeleteLayout => DeleteLayoutRequest, Empty;
    ImportLayout => ImportLayoutRequest, Empty;
    ExportAllLayouts => EmptyRequest, LayoutsResult;
    GetAllLayoutsSummaries => EmptyRequest, LayoutSummaries;
    IsWindowInWorkspace => IsWindowInWorkspaceRequest, InWorkspaceResult;
    FrameHello => FrameHelloRequest, Empty;
}

impl Request {
    /// The single item this request addresses, when it addresses one by id.
    pub fn target_item(&self) -> Option<canopy_common::ItemId> {
        use canopy_common::ItemId;
        match self {
            Request::GetWorkspaceSnapshot(r)
            | Request::GetFrameSnapshot(r)
            | Request::GetFrameSummary(r)
            | Request::CloseItem(r)
            | Request::RestoreItem(r)
            | Request::MaximizeItem(r)
            | Request::FocusItem(r)
            | Request::ForceLoadWindow(r)
            | Request::EjectWindow(r) => Some(r.item_id.clone()),
            Request::AddWindow(r) => Some(r.parent_id.clone()),
            Request::AddContainer(r) => Some(r.parent_id.clone()),
            Request::MoveWindowTo(r) => Some(r.item_id.clone()),
            Request::ResizeItem(r) => Some(r.item_id.clone()),
            Request::MoveFrame(r) => Some(r.item_id.clone()),
            Request::SetItemTitle(r) => Some(r.item_id.clone()),
            Request::LockContainer(r) => Some(r.item_id.clone()),
            Request::LockWindow(r) => Some(r.item_id.clone()),
            Request::BundleWorkspace(r) => Some(ItemId::from(&r.workspace_id)),
            Request::HibernateWorkspace(r) | Request::ResumeWorkspace(r) => {
                Some(ItemId::from(&r.workspace_id))
            }
            Request::LockWorkspace(r) => Some(ItemId::from(&r.workspace_id)),
            Request::SaveLayout(r) => Some(ItemId::from(&r.workspace_id)),
            _ => None,
        }
    }
}
