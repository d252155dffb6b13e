//! Filesystem operations split into focused modules.

mod attrs;
mod browse;
mod dir_ops;
mod download;
mod upload;
mod utils;

pub use download::RemoteFile;
pub use upload::CreateOptions;
pub use utils::DEFAULT_PERMISSION;
