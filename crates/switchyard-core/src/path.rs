//! Field paths
//!
//! A field path is a dot-separated sequence of identifiers (`object.title`,
//! `alert.severity`) locating a value inside a nested JSON object. Each
//! component must match `[A-Za-z][A-Za-z0-9]*`.

use crate::error::ExtractionError;
use crate::types::json_type_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A parsed, validated field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dot-notated path
    ///
    /// Fails with [`ExtractionError::InvalidPath`] on an empty path, an empty
    /// component (including leading or trailing dots) or a component that does
    /// not start with an ASCII letter followed by ASCII letters and digits.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let invalid = |reason: String| ExtractionError::InvalidPath {
            path: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("path is empty".to_string()));
        }

        let mut segments = Vec::new();
        for (position, segment) in raw.split('.').enumerate() {
            if segment.is_empty() {
                return Err(invalid(format!("component {} is empty", position)));
            }

            let mut chars = segment.chars();
            let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
            if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid(format!(
                    "component '{}' must start with a letter and contain only letters and digits",
                    segment
                )));
            }

            segments.push(segment.to_string());
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for FieldPath {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = ExtractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Resolve `path` against `payload`
///
/// A `null` met at any depth before the path is exhausted is returned as a
/// successful `null` result. Arrays are never indexed: stepping into one is a
/// [`ExtractionError::NotTraversable`] failure, as is a non-object root.
pub fn extract<'a>(payload: &'a Value, path: &FieldPath) -> Result<&'a Value, ExtractionError> {
    if !payload.is_object() {
        return Err(ExtractionError::NotTraversable {
            segment: path.segments[0].clone(),
            found: json_type_name(payload),
        });
    }

    let mut current = payload;
    for segment in &path.segments {
        current = match current {
            Value::Null => return Ok(current),
            Value::Object(map) => map.get(segment).ok_or_else(|| ExtractionError::KeyNotFound {
                key: segment.clone(),
            })?,
            other => {
                return Err(ExtractionError::NotTraversable {
                    segment: segment.clone(),
                    found: json_type_name(other),
                })
            }
        };
    }

    Ok(current)
}

/// Parse `path` and resolve it in one step
pub fn extract_path<'a>(payload: &'a Value, path: &str) -> Result<&'a Value, ExtractionError> {
    let path = FieldPath::parse(path)?;
    extract(payload, &path)
}
