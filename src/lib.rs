//! Presign edge node library.
//!
//! Authenticates to a backend with an HMAC worker signature, swaps the
//! request path for a presigned origin URL, streams the object back and sets
//! a cache policy that never lets shared caches keep partial content.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod origin;
pub mod pipeline;
pub mod presign;
pub mod resilience;
pub mod signing;

pub use config::EdgeConfig;
pub use http::EdgeServer;
pub use lifecycle::Shutdown;
pub use pipeline::EdgePipeline;
