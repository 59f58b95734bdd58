//! Helpers shared by every conformance check.
//!
//! - [`message`]: JSON-RPC request builder and response classifier
//! - [`task`]: readers for `message/send` results
//! - [`constants`]: method names and well-known paths

pub mod constants;
pub mod message;
pub mod task;

pub use constants::*;
pub use message::*;
pub use task::*;
