//! Ownership, permission and timestamp operations.

use super::upload::CreateOptions;
use super::utils::{now_millis, validate_permission};
use crate::api::{response, Op};
use crate::error::{Result, WebHdfsError};
use crate::http::{Body, OperationRequest};
use crate::session::Session;

impl Session {
    /// Change owner and/or group. Only the fields given are sent.
    pub fn set_owner(&self, path: &str, owner: Option<&str>, group: Option<&str>) -> Result<()> {
        let owner = owner.filter(|o| !o.is_empty());
        let group = group.filter(|g| !g.is_empty());
        if owner.is_none() && group.is_none() {
            return Err(WebHdfsError::InvalidArgument(
                "set_owner needs an owner or a group".to_string(),
            ));
        }

        let mut request = OperationRequest::new(Op::SetOwner, self.resolve(path));
        if let Some(owner) = owner {
            request = request.param("owner", owner);
        }
        if let Some(group) = group {
            request = request.param("group", group);
        }
        response::empty(self.call(request)?)
    }

    /// Set the octal permission string, e.g. `"755"`.
    pub fn set_permission(&self, path: &str, permission: &str) -> Result<()> {
        let permission = validate_permission(permission)?;
        let request = OperationRequest::new(Op::SetPermission, self.resolve(path))
            .param("permission", permission);
        response::empty(self.call(request)?)
    }

    /// Set modification and access times in epoch milliseconds.
    ///
    /// `None` leaves the corresponding time unchanged (sent as `-1`).
    pub fn set_times(
        &self,
        path: &str,
        modification_time: Option<i64>,
        access_time: Option<i64>,
    ) -> Result<()> {
        let request = OperationRequest::new(Op::SetTimes, self.resolve(path))
            .param("modificationtime", modification_time.unwrap_or(-1))
            .param("accesstime", access_time.unwrap_or(-1));
        response::empty(self.call(request)?)
    }

    /// Create an empty file, or bump both timestamps to now if it exists.
    pub fn touch(&self, path: &str) -> Result<()> {
        match self.file_status(path) {
            Ok(_) => {
                let now = now_millis();
                self.set_times(path, Some(now), Some(now))
            }
            Err(e) if e.is_not_found() => self.create(path, Body::Empty, &CreateOptions::default()),
            Err(e) => Err(e),
        }
    }
}
