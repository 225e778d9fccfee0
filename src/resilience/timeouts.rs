//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap downstream calls with a deadline
//! - Cancel operations cleanly on timeout (the wrapped future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - An expired exchange returns 504 Gateway Timeout; an expired connect
//!   counts as an unreachable downstream

use std::future::Future;
use std::time::Duration;

/// A deadline expired before the wrapped operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{operation} timed out after {}ms", .after.as_millis())]
pub struct TimedOut {
    /// Short name of the operation, for logs and error bodies.
    pub operation: &'static str,
    pub after: Duration,
}

/// Run `future` with a deadline of `after`.
pub async fn with_deadline<F, T>(operation: &'static str, after: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(after, future)
        .await
        .map_err(|_| TimedOut { operation, after })
}
