//! TCP converter service.
//!
//! # Responsibilities
//! - Accept connections through the bounded [`Listener`]
//! - Read one `{"text": ...}` object per connection (no framing: the
//!   request is complete once it parses)
//! - Reply `{"phonetic": ...}` or `{"error": ...}`, then close
//!
//! # Design Decisions
//! - A failing connection is logged and dropped; the accept loop keeps going
//! - On shutdown the loop stops accepting and drains in-flight connections

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;

use crate::bridge::{ConversionRequest, ConversionResponse, ErrorBody};
use crate::config::ConverterConfig;
use crate::converter::dictionary::Dictionary;
use crate::net::{Accepted, ConnectionTracker, Listener, ListenerError};
use crate::observability::metrics;
use crate::resilience::{with_deadline, TimedOut};

/// How long shutdown waits for in-flight connections.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Back-off after a failed accept (e.g. file descriptor exhaustion).
const ACCEPT_ERROR_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("request exceeded {limit} bytes")]
    RequestTooLarge { limit: usize },

    #[error("request {0}")]
    Timeout(#[from] TimedOut),

    #[error("connection closed before a request was received")]
    Closed,

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

impl ConverterError {
    /// Whether the peer should get an `{"error": ...}` reply.
    fn is_reportable(&self) -> bool {
        matches!(
            self,
            ConverterError::InvalidRequest(_) | ConverterError::RequestTooLarge { .. } | ConverterError::Timeout(_)
        )
    }
}

/// The downstream service the relay's bridge talks to.
pub struct ConverterServer {
    config: Arc<ConverterConfig>,
    dictionary: Arc<Dictionary>,
}

impl ConverterServer {
    pub fn new(config: ConverterConfig, dictionary: Dictionary) -> Self {
        Self {
            config: Arc::new(config),
            dictionary: Arc::new(dictionary),
        }
    }

    /// Serve until `shutdown` fires, then drain in-flight connections.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ConverterError> {
        let tracker = ConnectionTracker::new();
        tracing::info!(
            address = %listener.local_addr()?,
            max_connections = listener.capacity(),
            dictionary_entries = self.dictionary.len(),
            "Converter starting"
        );

        loop {
            let accepted = tokio::select! {
                accepted = listener.accept() => accepted,
                _ = shutdown.recv() => break,
            };

            let Accepted { stream, peer, slot } = match accepted {
                Ok(accepted) => accepted,
                Err(ListenerError::Accept(e)) => {
                    tracing::warn!(error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_ERROR_DELAY).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let guard = tracker.track();
            let config = Arc::clone(&self.config);
            let dictionary = Arc::clone(&self.dictionary);

            tokio::spawn(async move {
                let _slot = slot;
                let connection_id = guard.id();
                match handle_connection(stream, &config, &dictionary).await {
                    Ok(()) => {
                        metrics::record_converter_connection("ok");
                        tracing::debug!(connection_id = %connection_id, peer = %peer, "Conversion served");
                    }
                    Err(e) => {
                        metrics::record_converter_connection("error");
                        tracing::warn!(connection_id = %connection_id, peer = %peer, error = %e, "Conversion failed");
                    }
                }
                drop(guard);
            });
        }

        tracing::info!(in_flight = tracker.active_count(), "Converter draining");
        if !tracker.wait_for_idle(DRAIN_TIMEOUT).await {
            tracing::warn!(in_flight = tracker.active_count(), "Drain timed out");
        }
        tracing::info!("Converter stopped");
        Ok(())
    }
}

/// Serve one conversion on `stream`.
pub async fn handle_connection<S>(
    mut stream: S,
    config: &ConverterConfig,
    dictionary: &Dictionary,
) -> Result<(), ConverterError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let read = with_deadline(
        "read",
        config.read_timeout(),
        read_request(&mut stream, config.max_request_bytes),
    )
    .await
    .map_err(ConverterError::from)
    .and_then(|result| result);

    let outcome = match read {
        Ok(request) => {
            let reply = ConversionResponse {
                phonetic: dictionary.convert_text(&request.text),
            };
            write_json(&mut stream, &reply).await?;
            Ok(())
        }
        Err(e) if e.is_reportable() => {
            let reply = ErrorBody { error: e.to_string() };
            write_json(&mut stream, &reply).await?;
            Err(e)
        }
        Err(e) => Err(e),
    };

    if let Err(e) = stream.shutdown().await {
        tracing::trace!(error = %e, "Shutdown after reply failed");
    }
    outcome
}

/// Read until the buffered bytes parse as one request.
async fn read_request<R>(reader: &mut R, limit: usize) -> Result<ConversionRequest, ConverterError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            if buf.is_empty() {
                return Err(ConverterError::Closed);
            }
            return serde_json::from_slice(&buf).map_err(ConverterError::InvalidRequest);
        }

        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > limit {
            return Err(ConverterError::RequestTooLarge { limit });
        }

        match serde_json::from_slice::<ConversionRequest>(&buf) {
            Ok(request) => return Ok(request),
            Err(e) if e.is_eof() => continue,
            Err(e) => return Err(ConverterError::InvalidRequest(e)),
        }
    }
}

async fn write_json<W, T>(writer: &mut W, value: &T) -> Result<(), ConverterError>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let bytes = serde_json::to_vec(value).map_err(std::io::Error::from)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
