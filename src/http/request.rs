//! Request handling and classification.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) when the client sent none
//! - Extract the media key from the request path
//! - Capture the inbound `Range` header for classification
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A key is validated non-empty before anything is signed or sent upstream
//! - The raw (still percent-encoded) path segment is the key, exactly as received

use axum::http::{header, request::Parts, HeaderValue, Request};
use std::fmt;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::cache::FetchKind;
use crate::http::error::EdgeError;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeEdgeRequestId;

impl MakeRequestId for MakeEdgeRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Logical resource identifier; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey(String);

impl MediaKey {
    /// Returns `None` for an empty key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip `prefix` from `path` to obtain the media key.
///
/// `prefix` ends with `/`. The bare prefix, with or without its trailing
/// slash, yields [`EdgeError::MissingKey`]; anything outside it is
/// [`EdgeError::NotFound`].
pub fn parse_media_key(path: &str, prefix: &str) -> Result<MediaKey, EdgeError> {
    match path.strip_prefix(prefix) {
        Some(rest) => MediaKey::new(rest).ok_or(EdgeError::MissingKey),
        None if path == prefix.trim_end_matches('/') => Err(EdgeError::MissingKey),
        None => Err(EdgeError::NotFound),
    }
}

/// The parts of an inbound request the pipeline looks at.
#[derive(Debug, Clone)]
pub struct EdgeRequest {
    pub path: String,
    pub range: Option<HeaderValue>,
    pub request_id: String,
}

impl EdgeRequest {
    pub fn from_parts(parts: &Parts) -> Self {
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Self {
            path: parts.uri.path().to_string(),
            range: parts.headers.get(header::RANGE).cloned(),
            request_id,
        }
    }

    /// Range requests bypass long-lived caching; everything else is a full fetch.
    pub fn kind(&self) -> FetchKind {
        if self.range.is_some() {
            FetchKind::Range
        } else {
            FetchKind::Full
        }
    }
}
