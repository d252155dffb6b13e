//! Session management.

#[allow(clippy::module_inception)]
mod session;

pub use session::Session;
