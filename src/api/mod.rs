//! Gateway protocol: op-codes and response interpretation.

pub mod op;
pub mod response;

pub use op::Op;
