//! Error types for the tamper engine.

use thiserror::Error;

/// Errors surfaced by the engine and its command protocol.
///
/// Store lookups never produce an error: a request with no applicable spec is
/// the common case and is reported as `None`.
#[derive(Debug, Error)]
pub enum TamperError {
    /// Pattern registration is missing a matcher or a tamper spec, or carries
    /// a regex that does not compile.
    #[error("invalid tamper spec: {0}")]
    InvalidSpec(String),

    /// A redirect status arrived without a `Location` header.
    #[error("redirect status {status} for request {request_id} has no Location header")]
    MalformedRedirect { request_id: String, status: u16 },

    /// Reserved command that has no implementation.
    #[error("command not implemented: {0}")]
    NotImplemented(String),

    /// A tagged URL carried a token that is not valid transport text.
    #[error("failed to decode tamper token: {0}")]
    Decode(String),

    /// A spec could not be serialized for transport.
    #[error("failed to encode tamper spec: {0}")]
    Encode(#[from] serde_json::Error),

    /// Caller message named a command outside the known set.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Caller message had no `command` field.
    #[error("message has no command field")]
    MissingCommand,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, TamperError>;
