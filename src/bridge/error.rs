use std::io;

use crate::resilience::TimedOut;

/// Failure of a single bridge exchange.
///
/// The `Display` text is what the HTTP caller sees in `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("connection closed before a response was received")]
    Closed,

    #[error("downstream {0}")]
    Timeout(#[from] TimedOut),

    #[error("downstream response exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("downstream response is not valid JSON: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl BridgeError {
    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Connect { .. } => "connect",
            BridgeError::Io(_) => "io",
            BridgeError::Closed => "closed",
            BridgeError::Timeout(_) => "timeout",
            BridgeError::ResponseTooLarge { .. } => "too_large",
            BridgeError::InvalidResponse(_) => "invalid_response",
            BridgeError::Encode(_) => "encode",
        }
    }
}
