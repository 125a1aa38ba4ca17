//! Core error types for healthbuddy-core.
//!
//! This module defines the error hierarchy using thiserror. The dispenser
//! simulation itself has no fallible I/O; its only error is a rejected
//! transition. Configuration and login carry their own enums.

use std::path::PathBuf;
use thiserror::Error;

use crate::dispenser::ConnectionStatus;

/// Core error type for healthbuddy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Dispenser state machine errors
    #[error("Dispenser error: {0}")]
    Dispenser(#[from] DispenserError),

    /// Login errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operations that drive the dispenser state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispenserOperation {
    Connect,
    Dispense,
}

impl std::fmt::Display for DispenserOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispenserOperation::Connect => f.write_str("connect"),
            DispenserOperation::Dispense => f.write_str("dispense"),
        }
    }
}

/// Dispenser-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispenserError {
    /// Operation called from a status that does not allow it.
    /// The status is left untouched.
    #[error("cannot {operation} while dispenser is {status}")]
    InvalidTransition {
        operation: DispenserOperation,
        status: ConnectionStatus,
    },

    /// Dispenser is switched off in settings.
    #[error("dispenser is disabled in settings")]
    Disabled,
}

/// Login errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter both email and password")]
    MissingFields,

    #[error("Invalid credentials. Try test@buddy.com / 123456")]
    InvalidCredentials,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dotted key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home directory could not be resolved or created
    #[error("Cannot resolve data directory: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_operation_and_status() {
        let err = DispenserError::InvalidTransition {
            operation: DispenserOperation::Dispense,
            status: ConnectionStatus::Scanning,
        };
        assert_eq!(err.to_string(), "cannot dispense while dispenser is scanning");

        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::Dispenser(_)));
    }

    #[test]
    fn auth_error_converts() {
        let core: CoreError = AuthError::MissingFields.into();
        assert_eq!(
            core.to_string(),
            "Authentication error: Please enter both email and password"
        );
    }
}
