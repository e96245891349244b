//! Client-facing error mapping.
//!
//! # Design Decisions
//! - Every failure is terminal for the request and answered immediately
//! - Bodies are short diagnostics; upstream details stay in the logs
//! - Error responses carry `Cache-Control: no-store` so no cache keeps them

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::origin::OriginError;
use crate::presign::PresignError;

/// Terminal states of the request pipeline.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// Path had the media prefix but no key after it.
    #[error("missing key")]
    MissingKey,

    /// Path is not under the media prefix.
    #[error("not found")]
    NotFound,

    /// Presign exchange failed for any reason.
    #[error("Presign failed")]
    Presign(#[from] PresignError),

    /// Origin answered a full fetch with a non-2xx status.
    #[error("origin fetch failed: {} {}", .status.as_u16(), .body)]
    OriginStatus { status: StatusCode, body: String },

    /// Origin could not be reached or did not answer in time.
    #[error("origin fetch failed: {0}")]
    Origin(#[from] OriginError),
}

impl EdgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EdgeError::MissingKey => StatusCode::BAD_REQUEST,
            EdgeError::NotFound => StatusCode::NOT_FOUND,
            EdgeError::Presign(_) => StatusCode::BAD_GATEWAY,
            EdgeError::OriginStatus { status, .. } => *status,
            EdgeError::Origin(OriginError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            EdgeError::Origin(OriginError::Transport(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            EdgeError::MissingKey => "missing_key",
            EdgeError::NotFound => "not_found",
            EdgeError::Presign(_) => "presign_failed",
            EdgeError::OriginStatus { .. } => "origin_status",
            EdgeError::Origin(OriginError::Timeout(_)) => "origin_timeout",
            EdgeError::Origin(OriginError::Transport(_)) => "origin_transport",
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CACHE_CONTROL, "no-store")],
            self.to_string(),
        )
            .into_response()
    }
}
