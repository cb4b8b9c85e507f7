//! Core error types for studyplan-core.
//!
//! This module defines the error hierarchy using thiserror. The scheduling
//! engine uses these internally; its public entry point folds any of them
//! into an unsuccessful `ScheduleResult` instead of returning them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Date arithmetic left the representable range
    #[error("Date arithmetic overflow while computing {context}")]
    TimeOverflow { context: String },
}

impl ValidationError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn overflow(context: impl Into<String>) -> Self {
        ValidationError::TimeOverflow {
            context: context.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts_to_core_error() {
        let err: CoreError = ValidationError::invalid_value("days_to_schedule", "must be positive").into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid value for 'days_to_schedule': must be positive"
        );
    }

    #[test]
    fn test_overflow_message_names_context() {
        let err = ValidationError::overflow("travel buffer");
        assert!(err.to_string().contains("travel buffer"));
    }
}
