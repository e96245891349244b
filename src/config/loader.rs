//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{EdgeConfig, LogFormat, WorkerSecret};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply process environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<EdgeConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`] but reads overrides through `lookup`.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<EdgeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => EdgeConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay recognized environment options onto `config`.
///
/// `CACHE_TTL`, `BACKEND_API_ENDPOINT` and `WORKER_SECRET` keep the names the
/// backend deployment already uses. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut EdgeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(ttl) = get("CACHE_TTL") {
        config.cache.ttl_secs = ttl.trim().parse().map_err(|e| ConfigError::Env {
            var: "CACHE_TTL",
            message: format!("'{}' is not a number of seconds: {}", ttl, e),
        })?;
    }
    if let Some(endpoint) = get("BACKEND_API_ENDPOINT") {
        config.backend.endpoint = endpoint;
    }
    if let Some(secret) = get("WORKER_SECRET") {
        config.backend.worker_secret = WorkerSecret::new(secret);
    }
    if let Some(addr) = get("EDGE_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(level) = get("EDGE_LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(format) = get("EDGE_LOG_FORMAT") {
        config.observability.log_format =
            format.parse::<LogFormat>().map_err(|message| ConfigError::Env {
                var: "EDGE_LOG_FORMAT",
                message,
            })?;
    }

    Ok(())
}
