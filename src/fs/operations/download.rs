//! Download operations.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::api::{response, Op};
use crate::error::Result;
use crate::fs::path::ResolvedPath;
use crate::http::OperationRequest;
use crate::session::Session;
use crate::stream::copy_chunked;

/// Content of a remote file, read straight from the response body.
///
/// The gateway already answered with a success status; reading only pulls
/// the remaining bytes.
pub struct RemoteFile {
    path: ResolvedPath,
    body: Box<dyn Read + Send>,
}

impl RemoteFile {
    /// Path that was opened.
    pub fn path(&self) -> &ResolvedPath {
        &self.path
    }
}

impl Read for RemoteFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

impl fmt::Debug for RemoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open a remote file for reading.
    ///
    /// The status is checked before this returns, so an error body is never
    /// mistaken for file content.
    pub fn open(&self, path: &str) -> Result<RemoteFile> {
        let path = self.resolve(path);
        let request = OperationRequest::new(Op::Open, path.clone());
        let response = response::check(self.call(request)?)?;
        Ok(RemoteFile {
            path,
            body: response.body,
        })
    }

    /// Stream a remote file into `writer`, returning the number of bytes copied.
    ///
    /// # Arguments
    /// * `path` - Remote file
    /// * `writer` - Destination; receives the content in bounded chunks
    pub fn read_to<W: Write + ?Sized>(&self, path: &str, writer: &mut W) -> Result<u64> {
        let mut file = self.open(path)?;
        let copied = copy_chunked(&mut file, writer)?;
        debug!(path = %file.path(), bytes = copied, "download complete");
        Ok(copied)
    }

    /// Read a whole remote file as UTF-8 text.
    pub fn read_to_string(&self, path: &str) -> Result<String> {
        let mut content = String::new();
        self.open(path)?.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Download a remote file to a local path.
    ///
    /// The local file is created (or truncated) only after the gateway has
    /// accepted the request, and is removed again if the transfer fails.
    pub fn get<P: AsRef<Path>>(&self, path: &str, local: P) -> Result<u64> {
        let local = local.as_ref();
        let mut remote = self.open(path)?;

        let mut writer = BufWriter::new(File::create(local)?);
        let result = copy_chunked(&mut remote, &mut writer);
        drop(writer);

        match result {
            Ok(copied) => {
                debug!(path = %remote.path(), local = %local.display(), bytes = copied, "download complete");
                Ok(copied)
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(local) {
                    warn!(local = %local.display(), error = %cleanup, "failed to remove partial download");
                }
                Err(e.into())
            }
        }
    }
}
