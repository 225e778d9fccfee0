//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_bridge_requests_total` (counter): bridge exchanges by outcome
//! - `relay_bridge_duration_seconds` (histogram): bridge exchange latency
//! - `relay_static_requests_total` (counter): static file requests by status
//! - `converter_connections_total` (counter): converter connections by outcome
//!
//! Without an installed recorder every call is a no-op, so tests and the
//! default configuration pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one bridge exchange; `outcome` is `ok` or a `BridgeError::kind`.
pub fn record_bridge_exchange(outcome: &'static str, started: Instant) {
    metrics::counter!("relay_bridge_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("relay_bridge_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_static_request(status: u16) {
    metrics::counter!("relay_static_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_converter_connection(outcome: &'static str) {
    metrics::counter!("converter_connections_total", "outcome" => outcome).increment(1);
}
