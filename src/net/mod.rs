//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plain: axum::serve on a tokio TcpListener
//!     → TLS:   tls.rs (rustls config) → axum-server
//!     → Hand off to HTTP layer
//! ```

pub mod tls;

pub use tls::load_tls_config;
