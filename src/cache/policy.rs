//! Cache-Control derivation for range and full-object responses.

use axum::http::header::{self, HeaderMap, HeaderValue};
use std::fmt;
use std::time::Duration;

use crate::config::CacheConfig;

/// Browser `max-age` for full-object responses.
pub const CLIENT_MAX_AGE_SECS: u64 = 3600;

/// Shape of the client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// No `Range` header: the whole object.
    Full,
    /// `Range` header present: partial content.
    Range,
}

impl FetchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchKind::Full => "full",
            FetchKind::Range => "range",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client and shared-cache lifetimes, rendered as a `Cache-Control` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDirective {
    pub max_age: u64,
    pub s_maxage: u64,
    pub immutable: bool,
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "public, max-age={}, s-maxage={}", self.max_age, self.s_maxage)?;
        if self.immutable {
            f.write_str(", immutable")?;
        }
        Ok(())
    }
}

/// How the transport's own edge cache should treat the origin fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeCacheMode {
    /// Do not store or serve this fetch from the edge cache.
    Bypass,
    /// Store the full response at the edge for the given time.
    CacheFor(Duration),
}

/// Everything the pipeline needs to know about caching one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub directive: CacheDirective,
    pub accept_ranges: bool,
    pub edge_cache: EdgeCacheMode,
}

impl CachePolicy {
    /// Return `headers` with `Cache-Control` and `Accept-Ranges` set per this policy.
    pub fn apply(&self, mut headers: HeaderMap) -> HeaderMap {
        match HeaderValue::from_str(&self.directive.to_string()) {
            Ok(value) => {
                headers.insert(header::CACHE_CONTROL, value);
            }
            Err(e) => tracing::error!(error = %e, "Unrepresentable Cache-Control value"),
        }
        if self.accept_ranges {
            headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        }
        headers
    }
}

/// Derives cache policies from request shape and the configured TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicyEngine {
    ttl_secs: u64,
}

impl CachePolicyEngine {
    pub fn new(ttl_secs: u64) -> Self {
        Self { ttl_secs }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl_secs)
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn policy_for(&self, kind: FetchKind) -> CachePolicy {
        match kind {
            FetchKind::Range => CachePolicy {
                directive: CacheDirective {
                    max_age: 0,
                    s_maxage: 0,
                    immutable: false,
                },
                accept_ranges: true,
                edge_cache: EdgeCacheMode::Bypass,
            },
            FetchKind::Full => CachePolicy {
                directive: CacheDirective {
                    max_age: CLIENT_MAX_AGE_SECS,
                    s_maxage: self.ttl_secs,
                    immutable: true,
                },
                accept_ranges: true,
                edge_cache: EdgeCacheMode::CacheFor(Duration::from_secs(self.ttl_secs)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_policy_is_never_shared_cached() {
        for ttl in [0, 60, 86_400, u64::MAX] {
            let policy = CachePolicyEngine::new(ttl).policy_for(FetchKind::Range);
            assert_eq!(policy.directive.s_maxage, 0);
            assert_eq!(policy.edge_cache, EdgeCacheMode::Bypass);
            assert_eq!(
                policy.directive.to_string(),
                "public, max-age=0, s-maxage=0"
            );
        }
    }

    #[test]
    fn test_full_policy() {
        let policy = CachePolicyEngine::new(86_400).policy_for(FetchKind::Full);
        assert_eq!(
            policy.directive.to_string(),
            "public, max-age=3600, s-maxage=86400, immutable"
        );
        assert!(policy.accept_ranges);
        assert_eq!(
            policy.edge_cache,
            EdgeCacheMode::CacheFor(Duration::from_secs(86_400))
        );
    }

    #[test]
    fn test_full_policy_uses_configured_ttl() {
        let engine = CachePolicyEngine::from_config(&CacheConfig { ttl_secs: 120 });
        let policy = engine.policy_for(FetchKind::Full);
        assert_eq!(policy.directive.s_maxage, 120);
        assert_eq!(policy.directive.max_age, CLIENT_MAX_AGE_SECS);
    }

    #[test]
    fn test_apply_overrides_origin_cache_control() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("private, no-store"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));

        let policy = CachePolicyEngine::new(300).policy_for(FetchKind::Full);
        let out = policy.apply(headers);

        assert_eq!(out.get_all(header::CACHE_CONTROL).iter().count(), 1);
        assert_eq!(
            out[header::CACHE_CONTROL],
            "public, max-age=3600, s-maxage=300, immutable"
        );
        assert_eq!(out[header::ACCEPT_RANGES], "bytes");
        assert_eq!(out[header::CONTENT_TYPE], "video/mp4");
    }

    #[test]
    fn test_fetch_kind_labels() {
        assert_eq!(FetchKind::Full.to_string(), "full");
        assert_eq!(FetchKind::Range.as_str(), "range");
    }
}
