//! Session state: transport plus the resolved home directory.

use std::fmt;

use tracing::debug;

use crate::api::{response, Op};
use crate::config::Config;
use crate::error::{Result, WebHdfsError};
use crate::fs::path::{PathResolver, ResolvedPath};
use crate::http::{HttpTransport, OperationRequest, RawResponse, Transport};

/// A connection to one gateway.
///
/// Creating a session issues a `gethomedirectory` call, so a session that
/// exists is known to be reachable and authenticated. All filesystem
/// operations are methods on this type; relative paths resolve against
/// [`Session::home`].
///
/// A session is not meant to be shared between threads; give each thread
/// its own.
pub struct Session {
    transport: Box<dyn Transport>,
    resolver: PathResolver,
}

impl Session {
    /// Connect to the gateway described by `config`.
    ///
    /// # Example
    /// ```no_run
    /// use webhdfs::{Config, Session};
    ///
    /// # fn example() -> webhdfs::Result<()> {
    /// let config = Config::new("https://gateway:8443/gateway/default/webhdfs/v1")
    ///     .with_credentials("alice", "secret");
    /// let session = Session::connect(&config)?;
    /// println!("home: {}", session.home());
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(config: &Config) -> Result<Self> {
        Self::with_transport(HttpTransport::new(config)?)
    }

    /// Build a session on top of any [`Transport`].
    pub fn with_transport<T: Transport + 'static>(transport: T) -> Result<Self> {
        let transport: Box<dyn Transport> = Box::new(transport);
        let home = request_home(transport.as_ref())?;
        debug!(home = %home, "session established");

        Ok(Self {
            transport,
            resolver: PathResolver::new(home.as_str()),
        })
    }

    /// Home directory reported by the gateway at connect time.
    pub fn home(&self) -> &ResolvedPath {
        self.resolver.home()
    }

    /// Resolve a user path against [`Session::home`].
    pub fn resolve(&self, path: &str) -> ResolvedPath {
        self.resolver.resolve(path)
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Issue one request. The response still has to be checked.
    pub(crate) fn call(&self, request: OperationRequest) -> Result<RawResponse> {
        self.transport.execute(request)
    }

    pub(crate) fn fetch_home(&self) -> Result<ResolvedPath> {
        request_home(self.transport.as_ref())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("home", self.home())
            .finish_non_exhaustive()
    }
}

fn request_home(transport: &dyn Transport) -> Result<ResolvedPath> {
    let request = OperationRequest::new(Op::GetHomeDirectory, ResolvedPath::root());
    let path: String = response::field(transport.execute(request)?, "Path")?;
    if !path.starts_with('/') {
        return Err(WebHdfsError::InvalidResponse(format!(
            "home directory {:?} is not absolute",
            path
        )));
    }
    Ok(crate::fs::path::normalize(&path))
}
