//! Downstream converter service.
//!
//! # Data Flow
//! ```text
//! TCP connection from the relay's bridge
//!     → server.rs (read one {"text": ...} object)
//!     → dictionary.rs (word → IPA, case-insensitive)
//!     → ipa.rs (IPA → hyphen-joined English sounds)
//!     → {"phonetic": "..."} written back, connection closed
//! ```

pub mod dictionary;
pub mod ipa;
pub mod server;

pub use dictionary::Dictionary;
pub use server::{ConverterError, ConverterServer};
