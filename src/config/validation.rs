//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency cap > 0)
//! - Check the backend endpoint and path prefix shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::EdgeConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `backend.endpoint`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.backend.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "backend.endpoint",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "backend.endpoint",
            format!("invalid URL '{}': {}", config.backend.endpoint, e),
        )),
    }

    if config.backend.worker_secret.expose().is_empty() {
        errors.push(ValidationError::new("backend.worker_secret", "must not be empty"));
    }

    if config.backend.worker_id.is_empty() {
        errors.push(ValidationError::new("backend.worker_id", "must not be empty"));
    }

    let prefix = &config.routing.path_prefix;
    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        errors.push(ValidationError::new(
            "routing.path_prefix",
            format!("'{}' must start and end with '/'", prefix),
        ));
    }

    let timeouts = [
        ("backend.timeout_secs", config.backend.timeout_secs),
        ("origin.connect_timeout_secs", config.origin.connect_timeout_secs),
        ("origin.response_timeout_secs", config.origin.response_timeout_secs),
        ("origin.read_timeout_secs", config.origin.read_timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.listener.max_concurrent_requests == 0 {
        errors.push(ValidationError::new(
            "listener.max_concurrent_requests",
            "must be greater than zero",
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{TlsConfig, WorkerSecret};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&EdgeConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = EdgeConfig::default();
        config.backend.endpoint = "not a url".into();
        config.backend.worker_secret = WorkerSecret::new("");
        config.routing.path_prefix = "videos".into();
        config.origin.response_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "backend.endpoint",
                "backend.worker_secret",
                "routing.path_prefix",
                "origin.response_timeout_secs",
            ]
        );
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let mut config = EdgeConfig::default();
        config.backend.endpoint = "ftp://api.example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "backend.endpoint");
        assert!(errors[0].message.contains("ftp"));
    }

    #[test]
    fn test_tls_paths_required() {
        let mut config = EdgeConfig::default();
        config.listener.tls = Some(TlsConfig {
            cert_path: "cert.pem".into(),
            key_path: String::new(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.tls.key_path");
    }
}
