//! # webhdfs
//!
//! Rust client library for WebHDFS-style REST gateways (WebHDFS, HttpFS,
//! Knox).
//!
//! ## Features
//!
//! - **Sessions**: one [`Session`] per gateway, created from an explicit
//!   [`Config`] (gateway URL, optional HTTP basic credentials, TLS
//!   verification switch). Connecting resolves the user's home directory.
//! - **Paths**: relative paths resolve against the home directory and every
//!   path is normalized textually (`.`, `..`, repeated `/`).
//! - **Metadata**: `file_status`, `list_status`, `content_summary`.
//! - **Transfers**: streamed `open`/`read_to`/`get` and `create`/`put`/`append`
//!   with bounded memory use, plus `concat`.
//! - **Namespace**: `rename`, `delete`, `mkdirs`, `create_symlink`,
//!   `set_owner`, `set_permission`, `set_times`, `touch`.
//! - **Errors**: gateway failures carry the HTTP status and diagnostic body;
//!   an operation the filesystem refused comes back as `Ok(false)`.
//!
//! ## Example
//!
//! ```no_run
//! use webhdfs::{Config, CreateOptions, Session};
//!
//! # fn example() -> webhdfs::Result<()> {
//! let config = Config::new("http://namenode:9870/webhdfs/v1");
//! let session = Session::connect(&config)?;
//!
//! session.create("test.txt", "1234567890", &CreateOptions::new().overwrite(true))?;
//! session.append("test.txt", "abcdefg")?;
//! session.mkdirs("example", webhdfs::DEFAULT_PERMISSION)?;
//!
//! if !session.rename("test.txt", "example/test.txt")? {
//!     println!("nothing moved");
//! }
//! for entry in session.list_status("example")? {
//!     println!("{} {}", entry.path_suffix, entry.length);
//! }
//!
//! let mut stdout = std::io::stdout();
//! session.read_to("example/test.txt", &mut stdout)?;
//! session.delete("example", true)?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod session;
pub mod stream;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, WebHdfsError};
pub use fs::{
    ContentSummary, CreateOptions, FileStatus, FileType, PathResolver, RemoteFile, ResolvedPath,
    DEFAULT_PERMISSION,
};
pub use http::{Body, HttpTransport, Method, OperationRequest, RawResponse, Transport};
pub use session::Session;
