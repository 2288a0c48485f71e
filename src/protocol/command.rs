//! Caller commands.
//!
//! Messages arrive as `{command, options}`. They are parsed into a
//! [`Command`] up front so dispatch is an exhaustive match and anything
//! outside the known set is a typed error rather than a silent drop.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, TamperError};
use crate::observability::metrics;
use crate::store::{PatternRegistration, TamperStore};

/// A parsed caller message.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Deliver a payload to the engine and get it acknowledged.
    SendBackground(Value),
    /// Register a pattern association.
    MetaTamper(PatternRegistration),
    /// Log the store contents.
    Print,
    /// Reserved.
    RegisterCb,
}

impl Command {
    pub const SEND_BACKGROUND: &'static str = "sendBackground";
    pub const META_TAMPER: &'static str = "MetaTamper";
    pub const PRINT: &'static str = "print";
    pub const REGISTER_CB: &'static str = "RegisterCb";

    pub fn name(&self) -> &'static str {
        match self {
            Command::SendBackground(_) => Self::SEND_BACKGROUND,
            Command::MetaTamper(_) => Self::META_TAMPER,
            Command::Print => Self::PRINT,
            Command::RegisterCb => Self::REGISTER_CB,
        }
    }

    /// Parse a raw `{command, options}` message.
    pub fn from_message(message: &Value) -> Result<Self> {
        let command = message
            .get("command")
            .and_then(Value::as_str)
            .ok_or(TamperError::MissingCommand)?;
        let options = message.get("options").cloned().unwrap_or(Value::Null);

        match command {
            Self::SEND_BACKGROUND => Ok(Command::SendBackground(options)),
            Self::META_TAMPER => serde_json::from_value(options)
                .map(Command::MetaTamper)
                .map_err(|e| TamperError::InvalidSpec(e.to_string())),
            Self::PRINT => Ok(Command::Print),
            Self::REGISTER_CB => Ok(Command::RegisterCb),
            other => Err(TamperError::UnknownCommand(other.to_string())),
        }
    }

    /// Wire form of this command.
    pub fn to_message(&self) -> Value {
        match self {
            Command::SendBackground(options) => json!({ "command": self.name(), "options": options }),
            Command::MetaTamper(registration) => {
                json!({ "command": self.name(), "options": registration })
            }
            Command::Print | Command::RegisterCb => json!({ "command": self.name() }),
        }
    }
}

/// Reply sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl CommandResponse {
    pub fn ok(msg: Option<String>) -> Self {
        Self { success: true, msg }
    }

    pub fn failure(err: &TamperError) -> Self {
        Self {
            success: false,
            msg: Some(err.to_string()),
        }
    }
}

/// Run a parsed command against the store.
pub fn dispatch(store: &mut TamperStore, command: Command) -> Result<CommandResponse> {
    match command {
        Command::SendBackground(payload) => {
            let echoed = match payload {
                Value::Null => None,
                Value::String(text) => Some(text),
                other => Some(other.to_string()),
            };
            tracing::info!(payload = ?echoed, "Background message received");
            Ok(CommandResponse::ok(echoed))
        }
        Command::MetaTamper(registration) => {
            store.add_pattern(registration)?;
            tracing::info!(patterns = store.pattern_len(), "Pattern registered");
            Ok(CommandResponse::ok(None))
        }
        Command::Print => {
            let snapshot = store.snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => tracing::info!(store = %json, "Store contents"),
                Err(e) => tracing::warn!(error = %e, "Failed to render store contents"),
            }
            Ok(CommandResponse::ok(Some(format!(
                "{} direct, {} patterns",
                store.direct_len(),
                store.pattern_len()
            ))))
        }
        Command::RegisterCb => Err(TamperError::NotImplemented(Command::REGISTER_CB.to_string())),
    }
}

/// Parse, dispatch and answer a raw caller message.
pub fn handle_message(store: &mut TamperStore, message: &Value) -> CommandResponse {
    let command = match Command::from_message(message) {
        Ok(command) => command,
        Err(e) => {
            let label = match e {
                TamperError::MissingCommand => "missing",
                TamperError::UnknownCommand(_) => "unknown",
                _ => Command::META_TAMPER,
            };
            metrics::record_command(label, false);
            tracing::warn!(error = %e, "Rejected caller message");
            return CommandResponse::failure(&e);
        }
    };

    let name = command.name();
    match dispatch(store, command) {
        Ok(response) => {
            metrics::record_command(name, true);
            response
        }
        Err(e) => {
            metrics::record_command(name, false);
            tracing::warn!(command = name, error = %e, "Command failed");
            CommandResponse::failure(&e)
        }
    }
}
