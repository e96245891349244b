//! Cache policy subsystem.
//!
//! # Data Flow
//! ```text
//! FetchKind (Range | Full) + configured TTL
//!     → policy.rs (CachePolicyEngine)
//!     → CachePolicy { Cache-Control directive, Accept-Ranges, edge-cache mode }
//!     → edge-cache mode handed to the origin fetch
//!     → directive applied to the filtered response headers
//! ```
//!
//! # Design Decisions
//! - Partial content is never stored by shared caches (`s-maxage=0`)
//! - Full objects are treated as write-once and marked `immutable`
//! - Policy is independent of the network so it can be tested alone

pub mod policy;

pub use policy::{
    CacheDirective, CachePolicy, CachePolicyEngine, EdgeCacheMode, FetchKind,
    CLIENT_MAX_AGE_SECS,
};
