//! Switchyard Core - Core types for the Switchyard webhook router
//!
//! This crate provides the fundamental types shared by the runtime and the server:
//! - Field paths and dot-path extraction over JSON payloads
//! - Filter rule and route mapping definitions
//! - The validated application configuration model
//! - Error types

pub mod config;
pub mod error;
pub mod path;
pub mod rule;
pub mod types;

// Re-export commonly used types
pub use config::{Config, GeneralConfig, LogFormat, LogLevel, ServerSettings};
pub use error::{ConfigError, ExtractionError};
pub use path::{extract, FieldPath};
pub use rule::{
    DefaultAction, FilterConditions, FilterOperator, FilterRule, FilteringConfig, LogicOperator,
    RouteMapping,
};
pub use types::RuleValue;
