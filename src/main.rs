//! Phonetic relay: HTTP front end.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────┐
//!                        │               PHONETIC RELAY              │
//!   Client Request       │  ┌──────────┐    ┌─────────────────────┐ │
//!   ─────────────────────┼─▶│  http    │───▶│ OPTIONS → 204       │ │
//!                        │  │  server  │    │ GET/HEAD → static   │ │
//!                        │  └──────────┘    │ POST /convert ──┐   │ │
//!                        │                  └─────────────────┼───┘ │
//!                        │                                    ▼     │
//!   Client Response      │  ┌──────────┐    ┌─────────────────────┐ │      Converter
//!   ◀────────────────────┼──│ response │◀───│     tcp bridge      │◀┼────▶ (TCP, one
//!                        │  └──────────┘    └─────────────────────┘ │      connection
//!                        └──────────────────────────────────────────┘      per request)
//! ```

use std::path::PathBuf;

use clap::Parser;

use phonetic_relay::config::load_or_default;
use phonetic_relay::lifecycle::{run_relay, Shutdown};
use phonetic_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "phonetic-relay")]
#[command(about = "HTTP front end relaying conversions to the TCP converter", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("phonetic-relay v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    run_relay(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
