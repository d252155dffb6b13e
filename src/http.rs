//! HTTP transport for gateway requests.
//!
//! [`Transport`] is the seam between the filesystem API and the wire: the API
//! builds an [`OperationRequest`], the transport turns it into a request
//! against `rest_api + path` and hands back a [`RawResponse`] whose body is
//! still unread. [`HttpTransport`] is the reqwest-backed implementation.

use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::sync::Arc;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::cookie::Jar;
use reqwest::header::{HeaderName, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::Url;
use tracing::debug;

use crate::api::Op;
use crate::config::Config;
use crate::error::{Result, WebHdfsError};
use crate::fs::path::ResolvedPath;

/// HTTP verbs used by the gateway protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request payload.
///
/// `Stream` bodies are passed to the HTTP layer as readers and are never
/// buffered in memory.
pub enum Body {
    Empty,
    Bytes(Vec<u8>),
    Stream {
        reader: Box<dyn Read + Send>,
        len: Option<u64>,
    },
}

impl Body {
    /// Stream a reader of unknown length (sent with chunked encoding).
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Body::Stream {
            reader: Box::new(reader),
            len: None,
        }
    }

    /// Stream a reader whose length is known up front.
    pub fn sized<R: Read + Send + 'static>(reader: R, len: u64) -> Self {
        Body::Stream {
            reader: Box::new(reader),
            len: Some(len),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Bytes(bytes) => bytes.is_empty(),
            Body::Stream { len, .. } => *len == Some(0),
        }
    }

    /// Drain the body into memory. Used by in-process transports.
    pub fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self {
            Body::Empty => Ok(Vec::new()),
            Body::Bytes(bytes) => Ok(bytes),
            Body::Stream { mut reader, .. } => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Empty
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Body::Stream { len, .. } => f.debug_struct("Stream").field("len", len).finish(),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::Bytes(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Bytes(text.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Bytes(text.as_bytes().to_vec())
    }
}

impl From<File> for Body {
    fn from(file: File) -> Self {
        match file.metadata() {
            Ok(meta) => Body::sized(file, meta.len()),
            Err(_) => Body::from_reader(file),
        }
    }
}

/// One gateway call: verb, target path, op-code, parameters and body.
#[derive(Debug)]
pub struct OperationRequest {
    pub method: Method,
    pub path: ResolvedPath,
    pub op: Op,
    pub params: Vec<(&'static str, String)>,
    pub body: Body,
}

impl OperationRequest {
    pub fn new(op: Op, path: ResolvedPath) -> Self {
        Self {
            method: op.method(),
            path,
            op,
            params: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Append a query parameter.
    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Look up a parameter value by name.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full query string pairs, `op` first.
    pub fn query(&self) -> Vec<(&str, &str)> {
        let mut query = Vec::with_capacity(self.params.len() + 1);
        query.push(("op", self.op.as_str()));
        query.extend(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        query
    }
}

/// Response as received, body not yet consumed.
pub struct RawResponse {
    pub status: u16,
    pub content_length: Option<String>,
    pub content_type: Option<String>,
    pub body: Box<dyn Read + Send>,
}

impl RawResponse {
    pub fn new<R: Read + Send + 'static>(status: u16, body: R) -> Self {
        Self {
            status,
            content_length: None,
            content_type: None,
            body: Box::new(body),
        }
    }

    /// In-memory response with explicit headers.
    pub fn from_bytes(status: u16, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            status,
            content_length: Some(bytes.len().to_string()),
            content_type: content_type.map(str::to_string),
            body: Box::new(Cursor::new(bytes)),
        }
    }

    /// In-memory `application/json` response.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::from_bytes(status, Some("application/json"), value.to_string().into_bytes())
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Something that can execute gateway requests.
///
/// Implementations must not interpret the status code; that is left to
/// [`crate::api::response`].
pub trait Transport {
    fn execute(&self, request: OperationRequest) -> Result<RawResponse>;
}

/// reqwest-backed transport with a persistent connection pool and cookie jar.
///
/// Data writes (`create`, `append`) use the two-step protocol: the operation
/// goes out without a body, and the body is streamed to the `Location` the
/// gateway redirects to. A streamed body cannot be replayed, so that redirect
/// is never left to reqwest.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    uploads: Client,
    base: Url,
    credentials: Option<(String, String)>,
}

impl HttpTransport {
    /// Build a transport from a validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let base = config.validate()?;

        if config.insecure {
            debug!(gateway = %base, "TLS certificate verification disabled");
        }

        let jar = Arc::new(Jar::default());
        let client = build_client(&jar, config.insecure, Policy::default())?;
        let uploads = build_client(&jar, config.insecure, Policy::none())?;

        Ok(Self {
            client,
            uploads,
            base,
            credentials: config
                .credentials()
                .map(|(user, pass)| (user.to_string(), pass.to_string())),
        })
    }

    /// Gateway base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `rest_api` followed by the percent-encoded path.
    pub fn url_for(&self, path: &ResolvedPath) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                WebHdfsError::Config(format!("rest_api {} cannot be a base URL", self.base))
            })?;
            segments.pop_if_empty();
            if path.is_root() {
                segments.push("");
            } else {
                segments.extend(path.segments());
            }
        }
        Ok(url)
    }

    /// Credentials go only to the gateway's own origin.
    fn authorize(&self, builder: RequestBuilder, target: &Url) -> RequestBuilder {
        match &self.credentials {
            Some((user, pass)) if target.origin() == self.base.origin() => {
                builder.basic_auth(user, Some(pass))
            }
            _ => builder,
        }
    }

    fn upload(&self, url: Url, request: OperationRequest) -> Result<RawResponse> {
        let first = self
            .authorize(self.uploads.request(request.method.into(), url.clone()), &url)
            .query(&request.query())
            .send()?;

        if !first.status().is_redirection() {
            if first.status().is_success() && !request.body.is_empty() {
                return Err(WebHdfsError::InvalidResponse(format!(
                    "{} on {} was accepted without a data redirect; the body was not sent",
                    request.op, request.path
                )));
            }
            return Ok(into_raw(first, request.op));
        }

        let location = first
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                WebHdfsError::InvalidResponse(format!(
                    "{} redirect without a Location header",
                    request.op
                ))
            })?;
        let target = url.join(location).map_err(|e| {
            WebHdfsError::InvalidResponse(format!("bad redirect location {:?}: {}", location, e))
        })?;
        debug!(op = %request.op, location = %target, "sending data to redirect target");

        let builder = self.authorize(
            self.uploads.request(request.method.into(), target.clone()),
            &target,
        );
        let second = with_body(builder, request.body).send()?;
        Ok(into_raw(second, request.op))
    }
}

fn build_client(jar: &Arc<Jar>, insecure: bool, redirect: Policy) -> Result<Client> {
    Ok(Client::builder()
        .cookie_provider(Arc::clone(jar))
        .timeout(None)
        .danger_accept_invalid_certs(insecure)
        .redirect(redirect)
        .build()?)
}

fn with_body(builder: RequestBuilder, body: Body) -> RequestBuilder {
    match body {
        Body::Empty => builder,
        Body::Bytes(bytes) => builder
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes),
        Body::Stream {
            reader,
            len: Some(len),
        } => builder
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(reqwest::blocking::Body::sized(reader, len)),
        Body::Stream { reader, len: None } => builder
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(reqwest::blocking::Body::new(reader)),
    }
}

fn into_raw(response: Response, op: Op) -> RawResponse {
    let status = response.status().as_u16();
    let header = |name: HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_length = header(CONTENT_LENGTH);
    let content_type = header(CONTENT_TYPE);
    debug!(status, op = %op, "gateway response");

    RawResponse {
        status,
        content_length,
        content_type,
        body: Box::new(response),
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: OperationRequest) -> Result<RawResponse> {
        let url = self.url_for(&request.path)?;
        debug!(
            method = request.method.as_str(),
            op = %request.op,
            path = %request.path,
            "gateway request"
        );

        if request.op.sends_data() {
            return self.upload(url, request);
        }

        let builder = self
            .authorize(self.client.request(request.method.into(), url.clone()), &url)
            .query(&request.query());
        let response = with_body(builder, request.body).send()?;
        Ok(into_raw(response, request.op))
    }
}
