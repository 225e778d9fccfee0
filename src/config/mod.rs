//! Relay and converter settings.
//!
//! ```text
//! relay.toml (optional, every key defaulted)
//!     → loader.rs      toml → RelayConfig
//!     → validation.rs  addresses, timeouts, limits
//!     → read-only for the life of the process
//! ```
//!
//! Both binaries read the same file; the converter only looks at
//! `[converter]` and `[observability]`.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::BridgeConfig;
pub use schema::ConverterConfig;
pub use schema::DownstreamConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ReadMode;
pub use schema::RelayConfig;
pub use schema::StaticFilesConfig;
pub use schema::TimeoutConfig;
