//! Request pipeline.
//!
//! # Data Flow
//! ```text
//! EdgeRequest
//!     → ParsePath   (prefix stripped → MediaKey, or 400/404)
//!     → Sign        (timestamp + HMAC)
//!     → Presign     (backend exchange, or 502)
//!     → Classify    (Range header → RangeFetch | FullFetch)
//!     → Fetch       (origin GET with edge-cache mode)
//!     → Filter      (allow-listed headers + CORS)
//!     → Policy      (Cache-Control, Accept-Ranges)
//!     → Respond     (origin status, streamed body)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential; each step consumes the previous one's output
//! - No state shared between requests beyond the immutable pipeline itself
//! - Range failures pass through verbatim; full-fetch failures become errors

pub mod engine;

pub use engine::EdgePipeline;
