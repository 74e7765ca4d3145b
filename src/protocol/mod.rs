//! Query Protocol
//!
//! Line-oriented text commands and the responses they produce.

mod command;
mod response;

pub use command::Command;
pub use response::Response;
