//! Configuration loading
//!
//! The configuration file is YAML. After parsing, the `server` section can be
//! overridden from `SWITCHYARD_*` environment variables (a `.env` file is
//! loaded first), and the result is validated as a whole.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use switchyard_core::{Config, LogFormat, LogLevel, ServerSettings};
use thiserror::Error;

/// Prefix of environment variables overriding the `server` section
pub const ENV_PREFIX: &str = "SWITCHYARD";

/// Failure to produce a valid configuration
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid environment override: {0}")]
    Environment(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] switchyard_core::ConfigError),
}

/// Server settings that may come from the environment
#[derive(Debug, Default, Deserialize)]
struct ServerOverrides {
    host: Option<String>,
    port: Option<u16>,
    workers: Option<usize>,
    log_level: Option<LogLevel>,
    log_format: Option<LogFormat>,
}

impl ServerOverrides {
    fn apply(self, settings: &mut ServerSettings) {
        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(workers) = self.workers {
            settings.workers = workers;
        }
        if let Some(log_level) = self.log_level {
            settings.log_level = log_level;
        }
        if let Some(log_format) = self.log_format {
            settings.log_format = log_format;
        }
    }
}

/// Load, override and validate the configuration at `path`
pub fn load_config(path: &Path) -> Result<Config, LoadError> {
    dotenvy::dotenv().ok();

    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse_document(&contents)?;
    apply_env_overrides(&mut config.server, None)?;
    config.validate()?;

    tracing::debug!(path = %path.display(), routes = config.routes.len(), "Configuration loaded");
    Ok(config)
}

/// Parse and validate a YAML document, without environment overrides
pub fn parse_config(yaml: &str) -> Result<Config, LoadError> {
    let config = parse_document(yaml)?;
    config.validate()?;
    Ok(config)
}

fn parse_document(yaml: &str) -> Result<Config, LoadError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Apply `SWITCHYARD_*` overrides to the server settings
///
/// # Arguments
/// * `settings` - Settings to update in place
/// * `source` - Variables to read instead of the process environment (for tests)
pub fn apply_env_overrides(
    settings: &mut ServerSettings,
    source: Option<HashMap<String, String>>,
) -> Result<(), LoadError> {
    let overrides: ServerOverrides = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(source),
        )
        .build()?
        .try_deserialize()?;

    overrides.apply(settings);
    Ok(())
}
