//! Origin fetch subsystem.
//!
//! # Data Flow
//! ```text
//! presigned URL + OriginRequest { Range, EdgeCacheMode }
//!     → fetcher.rs (GET, bounded time-to-headers)
//!     → OriginResponse { status, headers, streaming body }
//! ```
//!
//! # Design Decisions
//! - Body is streamed through untouched; nothing is buffered on the success path
//! - Dropping the response (client went away) drops the upstream connection
//! - `OriginFetcher` is the seam where a platform cache substrate plugs in

pub mod fetcher;

pub use fetcher::{
    HttpOriginFetcher, OriginError, OriginFetcher, OriginRequest, OriginResponse,
    ERROR_BODY_LIMIT,
};
