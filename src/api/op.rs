//! Gateway operation codes.

use std::fmt;

use crate::http::Method;

/// Value of the `op` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetHomeDirectory,
    GetContentSummary,
    GetFileStatus,
    ListStatus,
    Open,
    Create,
    Append,
    Concat,
    Rename,
    Delete,
    Mkdirs,
    SetOwner,
    SetPermission,
    SetTimes,
    CreateSymlink,
}

impl Op {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::GetHomeDirectory => "gethomedirectory",
            Op::GetContentSummary => "getcontentsummary",
            Op::GetFileStatus => "getfilestatus",
            Op::ListStatus => "liststatus",
            Op::Open => "open",
            Op::Create => "create",
            Op::Append => "append",
            Op::Concat => "concat",
            Op::Rename => "rename",
            Op::Delete => "delete",
            Op::Mkdirs => "mkdirs",
            Op::SetOwner => "setowner",
            Op::SetPermission => "setpermission",
            Op::SetTimes => "settimes",
            Op::CreateSymlink => "createsymlink",
        }
    }

    /// HTTP verb the gateway expects for this operation.
    pub fn method(&self) -> Method {
        match self {
            Op::GetHomeDirectory
            | Op::GetContentSummary
            | Op::GetFileStatus
            | Op::ListStatus
            | Op::Open => Method::Get,
            Op::Create
            | Op::Rename
            | Op::Mkdirs
            | Op::SetOwner
            | Op::SetPermission
            | Op::SetTimes
            | Op::CreateSymlink => Method::Put,
            Op::Append | Op::Concat => Method::Post,
            Op::Delete => Method::Delete,
        }
    }

    /// Whether the request body is file data.
    ///
    /// A namenode answers these with a redirect to a datanode, which is where
    /// the body has to go.
    pub fn sends_data(&self) -> bool {
        matches!(self, Op::Create | Op::Append)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
