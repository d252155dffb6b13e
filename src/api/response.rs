//! Gateway response interpretation.
//!
//! Every response goes through [`check`] first: status codes below 400 pass,
//! anything else becomes [`WebHdfsError::Remote`] with the diagnostic the
//! gateway sent (pretty-printed JSON, raw text, or a generic status line when
//! the body is empty).

use std::io::Read;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, WebHdfsError};
use crate::http::RawResponse;

/// Pass successful responses through, turn failures into errors.
pub fn check(response: RawResponse) -> Result<RawResponse> {
    if response.is_success() {
        return Ok(response);
    }
    Err(into_error(response))
}

fn into_error(mut response: RawResponse) -> WebHdfsError {
    let status = response.status;

    if response.content_length.as_deref() == Some("0") {
        return WebHdfsError::Remote {
            status,
            exception: None,
            message: generic_message(status),
        };
    }

    let mut raw = Vec::new();
    if let Err(e) = response.body.read_to_end(&mut raw) {
        return WebHdfsError::Remote {
            status,
            exception: None,
            message: format!("{} (failed to read error body: {})", generic_message(status), e),
        };
    }

    if is_json(response.content_type.as_deref()) {
        if let Ok(value) = serde_json::from_slice::<Value>(&raw) {
            let exception = value
                .pointer("/RemoteException/exception")
                .and_then(Value::as_str)
                .map(str::to_string);
            let message = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|_| String::from_utf8_lossy(&raw).into_owned());
            return WebHdfsError::Remote {
                status,
                exception,
                message,
            };
        }
    }

    let message = if raw.is_empty() {
        generic_message(status)
    } else {
        String::from_utf8_lossy(&raw).into_owned()
    };
    WebHdfsError::Remote {
        status,
        exception: None,
        message,
    }
}

/// Status line such as `500 Internal Server Error`.
fn generic_message(status: u16) -> String {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");
    let class = if status < 500 { "Client Error" } else { "Server Error" };
    format!("{} {}: {}", status, class, reason)
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

/// Check the response and parse its whole JSON body.
pub fn json(response: RawResponse) -> Result<Value> {
    let response = check(response)?;
    Ok(serde_json::from_reader(response.body)?)
}

/// Check the response and extract one top-level field, e.g. `"FileStatus"`.
pub fn field<T: DeserializeOwned>(response: RawResponse, name: &str) -> Result<T> {
    let mut value = json(response)?;
    let inner = value
        .get_mut(name)
        .map(Value::take)
        .ok_or_else(|| WebHdfsError::InvalidResponse(format!("missing field {:?}", name)))?;
    Ok(serde_json::from_value(inner)?)
}

/// Check the response and extract the `"boolean"` payload.
pub fn boolean(response: RawResponse) -> Result<bool> {
    field(response, "boolean")
}

/// Check the response and discard the body.
pub fn empty(response: RawResponse) -> Result<()> {
    let mut response = check(response)?;
    std::io::copy(&mut response.body, &mut std::io::sink())?;
    Ok(())
}

/// Check the response of a data write and discard the body.
///
/// A redirect that reaches this point was never followed, so the data did
/// not land anywhere.
pub fn written(response: RawResponse) -> Result<()> {
    if (300..400).contains(&response.status) {
        return Err(WebHdfsError::InvalidResponse(format!(
            "data write stopped at an unfollowed redirect (status {})",
            response.status
        )));
    }
    empty(response)
}
