//! Application configuration model
//!
//! The document has four sections: `general`, `server`, `filtering` and
//! `routes`. Deserialization checks shapes and field path syntax; [`Config::validate`]
//! checks everything that spans values (operator/value compatibility, URLs,
//! non-empty sections, numeric ranges).

use crate::error::ConfigError;
use crate::rule::{FilteringConfig, RouteMapping};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Complete, validated configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerSettings,

    pub filtering: FilteringConfig,

    pub routes: Vec<RouteMapping>,
}

impl Config {
    /// Validate every section, returning the first error found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general.validate()?;
        self.server.validate()?;
        self.filtering.validate()?;

        if self.routes.is_empty() {
            return Err(ConfigError::Empty("routes".to_string()));
        }
        for (index, route) in self.routes.iter().enumerate() {
            route.validate(&format!("routes[{}]", index))?;
        }

        Ok(())
    }
}

/// The `general` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Forwarding timeout in seconds
    pub route_timeout: u64,

    /// Log rotation size such as `200mb`; checked but not acted on, logs go to stdout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_rotation: Option<String>,
}

impl GeneralConfig {
    pub fn route_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.route_timeout)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.route_timeout == 0 {
            return Err(ConfigError::invalid(
                "general.route_timeout",
                "must be greater than zero",
            ));
        }

        if let Some(size) = &self.log_rotation {
            let pattern = Regex::new(r"(?i)^\d+[kmg]?b$")
                .map_err(|e| ConfigError::invalid("general.log_rotation", e.to_string()))?;
            if !pattern.is_match(size) {
                return Err(ConfigError::invalid(
                    "general.log_rotation",
                    format!("'{}' is not a size like 500kb, 200mb or 1gb", size),
                ));
            }
        }

        Ok(())
    }
}

/// The `server` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of runtime worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_workers() -> usize {
    1
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServerSettings {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let host_ok = !self.host.is_empty()
            && self
                .host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !host_ok {
            return Err(ConfigError::invalid(
                "server.host",
                format!("'{}' is not a valid host address", self.host),
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be between 1 and 65535"));
        }

        if self.workers == 0 {
            return Err(ConfigError::invalid("server.workers", "must be at least 1"));
        }

        Ok(())
    }
}

/// Log verbosity as written in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Equivalent `tracing` filter directive
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(ConfigError::invalid(
                "log_level",
                format!(
                    "unknown level '{}', expected one of debug, info, warning, error, critical",
                    other
                ),
            )),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
