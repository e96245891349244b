//! Worker request signing.
//!
//! # Data Flow
//! ```text
//! MediaKey + current epoch seconds
//!     → signature.rs (HMAC-SHA256 over "key\ntimestamp")
//!     → WorkerCredentials (timestamp, hex signature)
//!     → sent to the backend as X-Worker-* headers
//! ```
//!
//! # Design Decisions
//! - Signing is a pure function; the clock is read by the caller
//! - No local freshness check: the backend decides how old a timestamp may be
//! - The secret never appears in Debug output

pub mod signature;

pub use signature::{sign, RequestSigner, WorkerCredentials};
