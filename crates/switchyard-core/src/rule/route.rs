//! Route mapping definitions

use crate::error::ConfigError;
use crate::path::FieldPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Maps values of one payload field to destination URLs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMapping {
    /// Path of the payload field whose value selects the destination
    pub field: FieldPath,

    /// Exact string value -> destination URL
    pub mappings: BTreeMap<String, String>,
}

impl RouteMapping {
    pub fn new(field: FieldPath) -> Self {
        RouteMapping {
            field,
            mappings: BTreeMap::new(),
        }
    }

    /// Add a value -> destination entry
    pub fn with_mapping(mut self, value: impl Into<String>, url: impl Into<String>) -> Self {
        self.mappings.insert(value.into(), url.into());
        self
    }

    /// Destination for an exact, case-sensitive key
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.mappings.get(key).map(String::as_str)
    }

    /// Validate the mapping table
    ///
    /// # Arguments
    /// * `location` - Configuration path of this mapping, used in error messages
    pub fn validate(&self, location: &str) -> Result<(), ConfigError> {
        if self.mappings.is_empty() {
            return Err(ConfigError::Empty(format!("{}.mappings", location)));
        }

        for (key, destination) in &self.mappings {
            validate_destination(destination).map_err(|message| {
                ConfigError::invalid(format!("{}.mappings.{}", location, key), message)
            })?;
        }

        Ok(())
    }
}

fn validate_destination(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!(
            "'{}' must use http or https, found '{}'",
            raw,
            url.scheme()
        ));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("'{}' has no host", raw));
    }

    Ok(())
}
