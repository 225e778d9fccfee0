//! HTTP-to-TCP phonetic conversion relay.
//!
//! The HTTP front end serves a small static site and relays
//! `POST /convert` bodies to a TCP converter service, one connection per
//! conversion. The converter itself lives in [`converter`].

pub mod bridge;
pub mod config;
pub mod converter;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use bridge::{BridgeError, TcpBridge};
pub use config::RelayConfig;
pub use converter::ConverterServer;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
