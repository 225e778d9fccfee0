//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to downstream:
//!     → timeouts.rs (enforce connect and exchange deadlines)
//!     → On expiry: distinct timeout error, mapped to 504 by the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: a conversion is attempted exactly once

pub mod timeouts;

pub use timeouts::{with_deadline, TimedOut};
