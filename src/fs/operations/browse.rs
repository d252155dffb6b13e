//! Read-only metadata operations.

use crate::api::{response, Op};
use crate::error::Result;
use crate::fs::path::ResolvedPath;
use crate::fs::status::{ContentSummary, FileStatus, FileStatuses};
use crate::http::OperationRequest;
use crate::session::Session;

impl Session {
    /// Ask the gateway for the home directory again.
    ///
    /// [`Session::home`] keeps the value fetched at connect time.
    pub fn home_directory(&self) -> Result<ResolvedPath> {
        self.fetch_home()
    }

    /// Aggregated counts and sizes for a path.
    pub fn content_summary(&self, path: &str) -> Result<ContentSummary> {
        let request = OperationRequest::new(Op::GetContentSummary, self.resolve(path));
        response::field(self.call(request)?, "ContentSummary")
    }

    /// Status of a single entry.
    pub fn file_status(&self, path: &str) -> Result<FileStatus> {
        let request = OperationRequest::new(Op::GetFileStatus, self.resolve(path));
        response::field(self.call(request)?, "FileStatus")
    }

    /// Entries of a directory, in the order the gateway returns them.
    ///
    /// Listing a file yields one entry with an empty `path_suffix`.
    ///
    /// # Example
    /// ```no_run
    /// # use webhdfs::{Config, Session};
    /// # fn example() -> webhdfs::Result<()> {
    /// let session = Session::connect(&Config::new("http://namenode:9870/webhdfs/v1"))?;
    /// for entry in session.list_status("")? {
    ///     println!("{} ({} bytes)", entry.path_suffix, entry.length);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn list_status(&self, path: &str) -> Result<Vec<FileStatus>> {
        let request = OperationRequest::new(Op::ListStatus, self.resolve(path));
        let statuses: FileStatuses = response::field(self.call(request)?, "FileStatuses")?;
        Ok(statuses.file_status)
    }

    /// Whether `path` exists. A 404 maps to `false`; other failures are errors.
    pub fn exists(&self, path: &str) -> Result<bool> {
        match self.file_status(path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
