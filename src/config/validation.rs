//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, redirect statuses are 3xx)
//! - Compile preset patterns so a bad regex fails at startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TamperConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{TamperConfig, PLACEHOLDER_API_KEY};
use crate::store::PatternAssociation;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("engine.redirect_statuses: {0} is not a 3xx status")]
    NotARedirect(u16),

    #[error("admin.api_key must be changed when admin is enabled")]
    PlaceholderApiKey,

    #[error("patterns[{index}]: {reason}")]
    Pattern { index: usize, reason: String },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &TamperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    for &status in &config.engine.redirect_statuses {
        if !(300..400).contains(&status) {
            errors.push(ValidationError::NotARedirect(status));
        }
    }

    if config.admin.enabled && config.admin.api_key == PLACEHOLDER_API_KEY {
        errors.push(ValidationError::PlaceholderApiKey);
    }

    for (index, pattern) in config.patterns.iter().enumerate() {
        if let Err(e) = PatternAssociation::compile(pattern.clone()) {
            errors.push(ValidationError::Pattern {
                index,
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
