//! Process lifecycle for both binaries.
//!
//! ```text
//! startup.rs   config → metrics exporter → bind → serve
//! signals.rs   SIGINT / SIGTERM
//! shutdown.rs  broadcast to every server, which stops accepting and drains
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run_converter, run_relay, StartupError};
