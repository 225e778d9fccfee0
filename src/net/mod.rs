//! Network layer for the converter service.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (one slot per peer, bounded by max_connections)
//!     → connection.rs (conn-N id, in-flight count)
//!     → Hand off to the converter connection handler
//! ```
//!
//! # Design Decisions
//! - A slot is reserved before accepting, so overload waits in the backlog
//! - Shutdown drains whatever is still in flight

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Accepted, Listener, ListenerError, Slot};
