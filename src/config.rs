//! Client configuration.

use std::fs;
use std::path::Path;

use reqwest::Url;
use serde::Deserialize;

use crate::error::{Result, WebHdfsError};

/// Connection settings consumed when a session is created.
///
/// The JSON form matches the client config file:
///
/// ```json
/// { "rest_api": "https://gateway:14000/webhdfs/v1", "username": "alice", "password": "secret", "insecure": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Gateway base URL, e.g. `http://namenode:9870/webhdfs/v1`.
    pub rest_api: String,
    /// HTTP basic auth user.
    #[serde(default)]
    pub username: Option<String>,
    /// HTTP basic auth password.
    #[serde(default)]
    pub password: Option<String>,
    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,
}

impl Config {
    pub fn new(rest_api: impl Into<String>) -> Self {
        Self {
            rest_api: rest_api.into(),
            ..Self::default()
        }
    }

    /// Attach HTTP basic credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Read a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            WebHdfsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| WebHdfsError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Check the gateway URL and credentials, returning the parsed base URL.
    pub fn validate(&self) -> Result<Url> {
        if self.rest_api.trim().is_empty() {
            return Err(WebHdfsError::Config("rest_api is required".to_string()));
        }
        let url = Url::parse(self.rest_api.trim())
            .map_err(|e| WebHdfsError::Config(format!("invalid rest_api {:?}: {}", self.rest_api, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(WebHdfsError::Config(format!(
                "rest_api must be an http or https URL, got scheme {:?}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(WebHdfsError::Config(format!(
                "rest_api {:?} has no host",
                self.rest_api
            )));
        }

        if self.credentials().is_none() && (non_empty(&self.username) || non_empty(&self.password)) {
            return Err(WebHdfsError::Config(
                "username and password must be given together".to_string(),
            ));
        }

        Ok(url)
    }

    /// Basic auth pair, present only when both halves are non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
