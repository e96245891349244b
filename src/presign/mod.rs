//! Presign exchange with the backend.
//!
//! # Data Flow
//! ```text
//! MediaKey + WorkerCredentials
//!     → client.rs (GET {endpoint}/api/v1/file/presign-url?key=...)
//!     → types.rs (schema-checked JSON envelope)
//!     → PresignResult { url, expires } | PresignError
//! ```
//!
//! # Design Decisions
//! - Single attempt, no retries; any failure ends the request with 502
//! - Bounded total timeout per call
//! - `Presigner` trait lets the pipeline be exercised without a backend

pub mod client;
pub mod types;

pub use client::{presign_url, PresignClient, Presigner};
pub use types::{parse_presign_body, PresignError, PresignResult};
