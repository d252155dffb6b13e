//! Filesystem paths, records and operations.

mod operations;
pub mod path;
pub mod status;

pub use operations::{CreateOptions, RemoteFile, DEFAULT_PERMISSION};
pub use path::{PathResolver, ResolvedPath};
pub use status::{ContentSummary, FileStatus, FileType};
