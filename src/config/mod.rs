//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, preset patterns compiled)
//!     → TamperConfig (validated, immutable)
//!     → shared via Arc with the bridge
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, EngineConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    TamperConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
