//! Server-reported metadata records.

use serde::{Deserialize, Serialize};

/// Kind of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

/// Metadata for one entry, as returned by `getfilestatus` and `liststatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub length: u64,
    pub owner: String,
    pub group: String,
    /// Octal permission string, e.g. `"755"`.
    pub permission: String,
    /// Milliseconds since the epoch.
    pub modification_time: i64,
    /// Milliseconds since the epoch.
    pub access_time: i64,
    /// Entry name relative to the listed directory; empty for `getfilestatus`.
    #[serde(default)]
    pub path_suffix: String,
    #[serde(default)]
    pub block_size: u64,
    #[serde(default)]
    pub replication: u16,
    #[serde(default)]
    pub children_num: Option<u64>,
    #[serde(default)]
    pub file_id: Option<u64>,
    #[serde(default)]
    pub acl_bit: Option<bool>,
    /// Link target, present for symlinks.
    #[serde(default)]
    pub symlink: Option<String>,
}

impl FileStatus {
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.file_type == FileType::Symlink
    }

    /// Whether an ACL is attached beyond the permission bits.
    pub fn has_acl(&self) -> bool {
        self.acl_bit.unwrap_or(false)
    }
}

/// Aggregated usage of a directory tree (`getcontentsummary`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub directory_count: u64,
    pub file_count: u64,
    pub length: u64,
    /// Namespace quota, `-1` when unset.
    pub quota: i64,
    pub space_consumed: u64,
    /// Space quota, `-1` when unset.
    pub space_quota: i64,
}

/// `liststatus` envelope: `{"FileStatuses": {"FileStatus": [...]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct FileStatuses {
    #[serde(rename = "FileStatus", default)]
    pub file_status: Vec<FileStatus>,
}
