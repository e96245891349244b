//! Resilience subsystem.
//!
//! # Design Decisions
//! - Every upstream call is bounded by a timeout
//! - No retries: a failed presign or origin call ends the request

pub mod timeouts;

pub use timeouts::{with_timeout, TimedOut};
