//! Upload operations: create, append and concat.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use super::utils::{validate_permission, DEFAULT_PERMISSION};
use crate::api::{response, Op};
use crate::error::Result;
use crate::http::{Body, OperationRequest};
use crate::session::Session;

/// Options for [`Session::create`] and [`Session::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Octal permission for the new file.
    pub permission: String,
    /// Replace an existing file instead of failing.
    pub overwrite: bool,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = permission.into();
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            permission: DEFAULT_PERMISSION.to_string(),
            overwrite: false,
        }
    }
}

impl Session {
    /// Write a new file.
    ///
    /// Fails with a protocol error when the file exists and
    /// `options.overwrite` is false. Stream bodies are uploaded without being
    /// buffered.
    ///
    /// # Example
    /// ```no_run
    /// # use webhdfs::{Config, CreateOptions, Session};
    /// # fn example() -> webhdfs::Result<()> {
    /// # let session = Session::connect(&Config::new("http://namenode:9870/webhdfs/v1"))?;
    /// session.create("test.txt", "1234567890", &CreateOptions::new().overwrite(true))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn create(&self, path: &str, body: impl Into<Body>, options: &CreateOptions) -> Result<()> {
        let permission = validate_permission(&options.permission)?;
        let request = OperationRequest::new(Op::Create, self.resolve(path))
            .param("permission", permission)
            .param("overwrite", options.overwrite)
            .body(body.into());
        response::written(self.call(request)?)
    }

    /// Upload a local file. The file is opened for this call only.
    pub fn put<P: AsRef<Path>>(&self, path: &str, local: P, options: &CreateOptions) -> Result<()> {
        let local = local.as_ref();
        let file = File::open(local)?;
        let len = file.metadata()?.len();
        debug!(local = %local.display(), bytes = len, "uploading");
        self.create(path, Body::sized(file, len), options)
    }

    /// Append data to an existing file.
    pub fn append(&self, path: &str, body: impl Into<Body>) -> Result<()> {
        let request = OperationRequest::new(Op::Append, self.resolve(path)).body(body.into());
        response::written(self.call(request)?)
    }

    /// Append the content of a local file.
    pub fn append_file<P: AsRef<Path>>(&self, path: &str, local: P) -> Result<()> {
        let file = File::open(local.as_ref())?;
        let len = file.metadata()?.len();
        self.append(path, Body::sized(file, len))
    }

    /// Concatenate `sources` onto the end of `path`, in order.
    ///
    /// Sources are resolved like any other path. An empty source list issues
    /// no request.
    pub fn concat<S: AsRef<str>>(&self, path: &str, sources: &[S]) -> Result<()> {
        if sources.is_empty() {
            return Ok(());
        }
        let sources = sources
            .iter()
            .map(|s| self.resolve(s.as_ref()).into_string())
            .collect::<Vec<_>>()
            .join(",");
        let request =
            OperationRequest::new(Op::Concat, self.resolve(path)).param("sources", sources);
        response::empty(self.call(request)?)
    }
}
