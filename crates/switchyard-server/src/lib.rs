//! Switchyard HTTP Server Library
//!
//! Provides the REST API, configuration loading and error mapping for the
//! `switchyard` binary, exposed for testing and reuse.

pub mod api;
pub mod config;
pub mod error;

pub use api::rest::{create_router, AppState};
pub use config::{load_config, parse_config, LoadError};
