//! Presign protocol types and error definitions.

use axum::http::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A time-bounded origin URL issued by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PresignResult {
    /// Absolute URL of the origin object.
    pub url: Url,
    /// Expiry as reported by the backend, if it sent one.
    pub expires: Option<u64>,
}

/// Errors that can occur during the presign exchange.
#[derive(Debug, Error)]
pub enum PresignError {
    /// Backend unreachable or the connection failed mid-response.
    #[error("presign request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend did not answer within the configured timeout.
    #[error("presign request timed out after {0:?}")]
    Timeout(Duration),

    /// Backend answered with a non-2xx status.
    #[error("presign endpoint returned {0}")]
    UnexpectedStatus(StatusCode),

    /// Backend answered `success: false`.
    #[error("presign rejected by backend")]
    Rejected,

    /// Body was not the expected JSON envelope.
    #[error("malformed presign response: {0}")]
    Malformed(String),

    /// Configured endpoint cannot be combined with the key into a URL.
    #[error("invalid presign endpoint: {0}")]
    InvalidEndpoint(String),
}

impl PresignError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PresignError::Transport(_) => "transport",
            PresignError::Timeout(_) => "timeout",
            PresignError::UnexpectedStatus(_) => "status",
            PresignError::Rejected => "rejected",
            PresignError::Malformed(_) => "malformed",
            PresignError::InvalidEndpoint(_) => "endpoint",
        }
    }
}

#[derive(Debug, Deserialize)]
struct PresignEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<PresignData>,
}

#[derive(Debug, Deserialize)]
struct PresignData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires: Option<serde_json::Number>,
}

/// Parse and check a 2xx presign response body.
pub fn parse_presign_body(body: &[u8]) -> Result<PresignResult, PresignError> {
    let envelope: PresignEnvelope =
        serde_json::from_slice(body).map_err(|e| PresignError::Malformed(e.to_string()))?;

    if !envelope.success {
        return Err(PresignError::Rejected);
    }

    let data = envelope
        .data
        .ok_or_else(|| PresignError::Malformed("missing data".to_string()))?;

    let raw_url = data
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| PresignError::Malformed("missing data.url".to_string()))?;

    let url = Url::parse(&raw_url)
        .map_err(|e| PresignError::Malformed(format!("data.url is not a URL: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(PresignError::Malformed(format!(
            "data.url has unsupported scheme '{}'",
            url.scheme()
        )));
    }

    let expires = data
        .expires
        .and_then(|n| n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)));

    Ok(PresignResult { url, expires })
}
