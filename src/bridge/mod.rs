//! TCP bridge subsystem.
//!
//! # Data Flow
//! ```text
//! POST /convert handler
//!     → client.rs (connect, write {"text": ...}, read response, close)
//!     → downstream converter (one connection per conversion)
//!     → raw bytes or BridgeError back to the handler
//! ```
//!
//! # Design Decisions
//! - No framing on the wire: the request is one bare JSON object and the
//!   response ends at the first read or at peer close (see `ReadMode`)
//! - No pooling and no retries; each call is independent
//! - Errors keep their kind so the HTTP layer can pick 500, 502 or 504

pub mod client;
pub mod error;
pub mod message;

pub use client::TcpBridge;
pub use error::BridgeError;
pub use message::{ConversionRequest, ConversionResponse, ErrorBody};
