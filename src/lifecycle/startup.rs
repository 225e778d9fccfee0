//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start optional background services (metrics)
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::{ObservabilityConfig, RelayConfig};
use crate::converter::{ConverterServer, Dictionary};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::Listener;
use crate::observability::metrics;

/// Boxed error used by the binaries.
pub type StartupError = Box<dyn std::error::Error + Send + Sync>;

fn start_metrics(config: &ObservabilityConfig) {
    if !config.metrics_enabled {
        return;
    }
    match config.metrics_address.parse::<SocketAddr>() {
        Ok(addr) => metrics::init_metrics(addr),
        Err(e) => tracing::error!(
            metrics_address = %config.metrics_address,
            error = %e,
            "Failed to parse metrics address"
        ),
    }
}

/// Run the HTTP front end until `shutdown` fires.
pub async fn run_relay(config: RelayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        downstream = %config.downstream.address(),
        read_mode = ?config.bridge.read_mode,
        exchange_timeout_secs = config.timeouts.exchange_secs,
        "Configuration loaded"
    );
    start_metrics(&config.observability);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

/// Run the converter service until `shutdown` fires.
pub async fn run_converter(config: RelayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let converter = config.converter;
    start_metrics(&config.observability);

    let dictionary = Dictionary::load_or_empty(&converter.dictionary_path).await;
    let listener = Listener::bind(&converter.bind_address, converter.max_connections).await?;
    let server = ConverterServer::new(converter, dictionary);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
