//! Error types for Switchyard Core

use thiserror::Error;

/// Failure to resolve a field path against a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The path itself is malformed; no traversal was attempted
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A component remained but the current value is not an object
    #[error("Cannot traverse into '{segment}' through a value of type {found}")]
    NotTraversable { segment: String, found: &'static str },

    /// The current object has no such key
    #[error("Key '{key}' not found")]
    KeyNotFound { key: String },
}

/// Configuration-shape error, raised while loading configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("'{0}' must not be empty")]
    Empty(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field location the error refers to
    pub fn field(&self) -> &str {
        match self {
            ConfigError::InvalidValue { field, .. } => field,
            ConfigError::Empty(field) => field,
        }
    }
}
