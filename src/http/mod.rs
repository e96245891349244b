//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, media key, Range capture)
//!     → [pipeline: sign, presign, fetch]
//!     → response.rs (allow-listed headers, CORS)
//!     → error.rs (terminal failures → status + short body)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::EdgeError;
pub use request::{EdgeRequest, MakeEdgeRequestId, MediaKey, X_REQUEST_ID};
pub use response::filter_forward_headers;
pub use server::EdgeServer;
