//! Shared helpers for filesystem operations.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, WebHdfsError};

/// Permission applied by `create` and `mkdirs` when none is given.
pub const DEFAULT_PERMISSION: &str = "700";

/// Largest mode the gateway accepts: sticky bit plus `rwxrwxrwx`.
const MAX_PERMISSION: u32 = 0o1777;

/// Accept 1 to 4 octal digits up to `1777`, e.g. `0`, `44`, `755`, `1777`.
pub(crate) fn validate_permission(permission: &str) -> Result<&str> {
    let valid = (1..=4).contains(&permission.len())
        && permission.bytes().all(|b| (b'0'..=b'7').contains(&b))
        && u32::from_str_radix(permission, 8).is_ok_and(|mode| mode <= MAX_PERMISSION);
    if valid {
        Ok(permission)
    } else {
        Err(WebHdfsError::InvalidArgument(format!(
            "permission must be an octal mode between 0 and 1777, got {:?}",
            permission
        )))
    }
}

/// Milliseconds since the epoch.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
