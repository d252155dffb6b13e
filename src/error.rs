//! Error types for the webhdfs library.

use thiserror::Error;

/// Main error type for webhdfs operations.
#[derive(Error, Debug)]
pub enum WebHdfsError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An argument was rejected before any request was issued.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Network request error (connection refused, TLS failure, ...).
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Local I/O failed while streaming a body.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The gateway answered with an HTTP status >= 400.
    #[error("Server return code {status}, response message:\n{message}")]
    Remote {
        status: u16,
        /// `RemoteException.exception` when the body is the standard JSON envelope.
        exception: Option<String>,
        message: String,
    },

    /// A successful response did not carry the expected payload.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl WebHdfsError {
    /// HTTP status code of a protocol error.
    pub fn status(&self) -> Option<u16> {
        match self {
            WebHdfsError::Remote { status, .. } => Some(*status),
            WebHdfsError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the gateway reported that the path does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            WebHdfsError::Remote {
                status, exception, ..
            } => *status == 404 || exception.as_deref() == Some("FileNotFoundException"),
            _ => false,
        }
    }

    /// Whether the failure happened below the protocol layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, WebHdfsError::Request(_))
    }
}

/// Result type alias for webhdfs operations.
pub type Result<T> = std::result::Result<T, WebHdfsError>;
