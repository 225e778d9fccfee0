//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay
//! and the converter service. All types derive Serde traits for
//! deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration shared by both binaries.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// HTTP listener configuration.
    pub listener: ListenerConfig,

    /// Downstream TCP service the bridge talks to.
    pub downstream: DownstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Bridge read strategy and limits.
    pub bridge: BridgeConfig,

    /// Static file serving.
    pub static_files: StaticFilesConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Downstream converter service settings.
    pub converter: ConverterConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Downstream TCP endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    pub host: String,
    pub port: u16,
}

impl DownstreamConfig {
    /// `host:port` string suitable for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3005,
        }
    }
}

/// Timeout configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Downstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one bridge exchange (connect, write, read) in seconds.
    pub exchange_secs: u64,

    /// Overall HTTP request timeout in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn exchange(&self) -> Duration {
        Duration::from_secs(self.exchange_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            exchange_secs: 30,
            request_secs: 60,
        }
    }
}

/// How the bridge decides that the downstream response is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// The first non-empty read is the whole response. The read is offered
    /// up to `max_response_bytes` (at most 1 MiB), but whatever the socket
    /// has not delivered by then is not waited for, so large replies may
    /// arrive truncated.
    SingleRead,
    /// Accumulate until the downstream closes its side of the connection.
    #[default]
    UntilClose,
}

/// Bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Response completion strategy.
    pub read_mode: ReadMode,

    /// Largest downstream response accepted, in bytes.
    pub max_response_bytes: usize,

    /// Reject downstream responses that are not valid JSON.
    pub validate_response: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            read_mode: ReadMode::default(),
            max_response_bytes: 1024 * 1024,
            validate_response: false,
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory files are served from.
    pub root: PathBuf,

    /// Document served for `/`.
    pub index: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("front"),
            index: "index.html".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Converter service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Bind address for the TCP converter.
    pub bind_address: String,

    /// Pronunciation dictionary (`word /ipa/` per line).
    pub dictionary_path: PathBuf,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// Largest request accepted on one connection, in bytes.
    pub max_request_bytes: usize,

    /// Time allowed to receive a complete request, in seconds.
    pub read_timeout_secs: u64,
}

impl ConverterConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3005".to_string(),
            dictionary_path: PathBuf::from("en_UK.txt"),
            max_connections: 1024,
            max_request_bytes: 64 * 1024,
            read_timeout_secs: 10,
        }
    }
}
