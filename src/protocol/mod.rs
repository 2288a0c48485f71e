//! Caller message protocol.

pub mod command;

pub use command::{dispatch, handle_message, Command, CommandResponse};
