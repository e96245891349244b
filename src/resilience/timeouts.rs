//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls (presign, origin headers) with a deadline
//! - Cancel the wrapped future cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out origin fetches return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The wrapped operation did not finish in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {after:?}")]
pub struct TimedOut {
    pub after: Duration,
}

/// Run `fut`, dropping it if it has not completed after `after`.
pub async fn with_timeout<F>(after: Duration, fut: F) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| TimedOut { after })
}
