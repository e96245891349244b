//! Response header filtering.
//!
//! # Responsibilities
//! - Project origin response headers onto an allow-list
//! - Guarantee a CORS allow-origin header on every forwarded response
//!
//! # Design Decisions
//! - Hop-by-hop, security and infrastructure headers are dropped by omission
//! - Pure function: borrows the origin map, returns a new one
//! - Re-filtering a filtered map is a no-op

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Cloudflare's cache status, forwarded for debugging cache behaviour.
pub const CF_CACHE_STATUS: HeaderName = HeaderName::from_static("cf-cache-status");

/// Origin headers copied through to the client.
pub const FORWARDED_HEADERS: [HeaderName; 9] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::LAST_MODIFIED,
    header::ETAG,
    header::CACHE_CONTROL,
    header::ACCEPT_RANGES,
    header::CONTENT_RANGE,
    header::CONTENT_DISPOSITION,
    CF_CACHE_STATUS,
];

/// Allow-origin value on every forwarded response. The origin's own value is
/// not on the allow-list, so it never reaches the client.
pub const DEFAULT_ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");

/// Whether `name` survives [`filter_forward_headers`].
pub fn is_forwarded(name: &HeaderName) -> bool {
    *name == header::ACCESS_CONTROL_ALLOW_ORIGIN || FORWARDED_HEADERS.contains(name)
}

/// Build the client-facing header set from an origin response.
pub fn filter_forward_headers(origin: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(FORWARDED_HEADERS.len() + 1);

    for name in FORWARDED_HEADERS.iter() {
        for value in origin.get_all(name) {
            out.append(name.clone(), value.clone());
        }
    }

    if !out.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
        out.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, DEFAULT_ALLOW_ORIGIN);
    }

    out
}
