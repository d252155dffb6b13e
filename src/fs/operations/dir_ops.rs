//! Namespace mutations: rename, delete, mkdirs and symlinks.
//!
//! `rename`, `delete` and `mkdirs` return the gateway's `boolean` payload.
//! `Ok(false)` means the request was valid but nothing changed (missing
//! source, existing target, ...); protocol failures are errors.

use super::utils::validate_permission;
use crate::api::{response, Op};
use crate::error::Result;
use crate::http::OperationRequest;
use crate::session::Session;

impl Session {
    /// Rename or move `path` to `dest`.
    ///
    /// When `dest` is an existing directory the entry is moved into it.
    pub fn rename(&self, path: &str, dest: &str) -> Result<bool> {
        let request = OperationRequest::new(Op::Rename, self.resolve(path))
            .param("destination", self.resolve(dest));
        response::boolean(self.call(request)?)
    }

    /// Delete a file or directory.
    pub fn delete(&self, path: &str, recursive: bool) -> Result<bool> {
        let request =
            OperationRequest::new(Op::Delete, self.resolve(path)).param("recursive", recursive);
        response::boolean(self.call(request)?)
    }

    /// Create a directory and any missing parents.
    ///
    /// Succeeds with `true` when the directory already exists.
    pub fn mkdirs(&self, path: &str, permission: &str) -> Result<bool> {
        let permission = validate_permission(permission)?;
        let request =
            OperationRequest::new(Op::Mkdirs, self.resolve(path)).param("permission", permission);
        response::boolean(self.call(request)?)
    }

    /// Create a symbolic link at `link` pointing to `target`.
    pub fn create_symlink(&self, link: &str, target: &str, create_parent: bool) -> Result<()> {
        let request = OperationRequest::new(Op::CreateSymlink, self.resolve(link))
            .param("destination", self.resolve(target))
            .param("createParent", create_parent);
        response::empty(self.call(request)?)
    }
}
