//! One-shot TCP exchange with the downstream converter.
//!
//! # Responsibilities
//! - Open a fresh connection per conversion (no pooling, no reuse)
//! - Write the encoded request as the whole outbound payload
//! - Read the response according to the configured [`ReadMode`]
//! - Bound the exchange with connect and exchange deadlines
//!
//! # Design Decisions
//! - The socket is owned by the exchange future; dropping the future (client
//!   went away, deadline hit) closes the connection
//! - The response is returned byte-for-byte; validation is opt-in

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::bridge::error::BridgeError;
use crate::bridge::message::OutboundRequest;
use crate::config::{ReadMode, RelayConfig};
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// Bytes requested from the socket per read.
const READ_CHUNK: usize = 16 * 1024;

/// Largest buffer offered to a single read.
const SINGLE_READ_MAX: usize = 1024 * 1024;

/// Client side of the relay → downstream exchange.
#[derive(Debug, Clone)]
pub struct TcpBridge {
    address: String,
    read_mode: ReadMode,
    max_response_bytes: usize,
    validate_response: bool,
    connect_timeout: Duration,
    exchange_timeout: Duration,
}

impl TcpBridge {
    /// Build a bridge from the downstream, bridge and timeout sections.
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            address: config.downstream.address(),
            read_mode: config.bridge.read_mode,
            max_response_bytes: config.bridge.max_response_bytes,
            validate_response: config.bridge.validate_response,
            connect_timeout: config.timeouts.connect(),
            exchange_timeout: config.timeouts.exchange(),
        }
    }

    /// Downstream `host:port` this bridge connects to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Send `{"text": text}` downstream and return the raw response.
    pub async fn forward(&self, text: &str) -> Result<Bytes, BridgeError> {
        let started = Instant::now();
        let payload = serde_json::to_vec(&OutboundRequest { text }).map_err(BridgeError::Encode)?;

        let result = match with_deadline("exchange", self.exchange_timeout, self.exchange(&payload)).await {
            Ok(result) => result,
            Err(timed_out) => Err(timed_out.into()),
        };

        match &result {
            Ok(response) => {
                tracing::debug!(
                    downstream = %self.address,
                    request_bytes = payload.len(),
                    response_bytes = response.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Bridge exchange complete"
                );
                metrics::record_bridge_exchange("ok", started);
            }
            Err(e) => {
                tracing::warn!(
                    downstream = %self.address,
                    kind = e.kind(),
                    error = %e,
                    "Bridge exchange failed"
                );
                metrics::record_bridge_exchange(e.kind(), started);
            }
        }

        result
    }

    async fn exchange(&self, payload: &[u8]) -> Result<Bytes, BridgeError> {
        let mut stream = connect_within(
            &self.address,
            self.connect_timeout,
            TcpStream::connect(&self.address),
        )
        .await?;

        stream.write_all(payload).await?;
        stream.flush().await?;

        let response = match self.read_mode {
            ReadMode::SingleRead => read_first_chunk(&mut stream, self.max_response_bytes).await?,
            ReadMode::UntilClose => read_until_close(&mut stream, self.max_response_bytes).await?,
        };

        // The response is complete; a failed shutdown changes nothing for the caller.
        if let Err(e) = stream.shutdown().await {
            tracing::trace!(error = %e, "Downstream shutdown failed");
        }

        if self.validate_response {
            serde_json::from_slice::<serde::de::IgnoredAny>(&response)
                .map_err(BridgeError::InvalidResponse)?;
        }

        Ok(response)
    }
}

/// An unreachable downstream is a connect failure whether it refuses or
/// never answers the handshake.
async fn connect_within<F>(address: &str, limit: Duration, connect: F) -> Result<TcpStream, BridgeError>
where
    F: Future<Output = io::Result<TcpStream>>,
{
    with_deadline("connect", limit, connect)
        .await
        .map_err(|elapsed| io::Error::new(io::ErrorKind::TimedOut, elapsed))
        .and_then(|connected| connected)
        .map_err(|source| BridgeError::Connect {
            addr: address.to_string(),
            source,
        })
}

/// The first non-empty read is taken as the whole response.
async fn read_first_chunk<R>(reader: &mut R, limit: usize) -> Result<Bytes, BridgeError>
where
    R: AsyncRead + Unpin,
{
    // One byte past the limit so an oversized reply is detected, not cut.
    let mut buf = BytesMut::with_capacity(limit.saturating_add(1).min(SINGLE_READ_MAX + 1));
    let n = reader.read_buf(&mut buf).await?;
    if n == 0 {
        return Err(BridgeError::Closed);
    }
    if n > limit {
        return Err(BridgeError::ResponseTooLarge { limit });
    }
    Ok(buf.freeze())
}

/// Accumulate until the peer closes its write side.
async fn read_until_close<R>(reader: &mut R, limit: usize) -> Result<Bytes, BridgeError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    loop {
        buf.reserve(READ_CHUNK);
        if reader.read_buf(&mut buf).await? == 0 {
            break;
        }
        if buf.len() > limit {
            return Err(BridgeError::ResponseTooLarge { limit });
        }
    }
    if buf.is_empty() {
        return Err(BridgeError::Closed);
    }
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept one connection, capture the request, reply with `reply` and close.
    async fn one_shot_downstream(reply: &'static [u8]) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 1024];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(reply).await.unwrap();
            socket.shutdown().await.unwrap();
            buf.truncate(n);
            buf
        });
        (addr, handle)
    }

    fn bridge_to(addr: &str, read_mode: ReadMode) -> TcpBridge {
        let (host, port) = addr.rsplit_once(':').unwrap();
        let mut config = RelayConfig::default();
        config.downstream.host = host.to_string();
        config.downstream.port = port.parse().unwrap();
        config.bridge.read_mode = read_mode;
        config.timeouts.exchange_secs = 2;
        TcpBridge::from_config(&config)
    }

    #[tokio::test]
    async fn sends_json_text_and_returns_raw_reply() {
        let (addr, downstream) = one_shot_downstream(br#"{"phonetic":"h-a-t"}"#).await;
        let bridge = bridge_to(&addr, ReadMode::UntilClose);

        let response = bridge.forward("hat").await.unwrap();
        assert_eq!(&response[..], br#"{"phonetic":"h-a-t"}"#);
        assert_eq!(downstream.await.unwrap(), br#"{"text":"hat"}"#);
    }

    #[tokio::test]
    async fn single_read_mode_returns_first_chunk() {
        let (addr, _downstream) = one_shot_downstream(b"not json at all").await;
        let bridge = bridge_to(&addr, ReadMode::SingleRead);

        let response = bridge.forward("x").await.unwrap();
        assert_eq!(&response[..], b"not json at all");
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        // Bind then drop to get a port nobody listens on.
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap().to_string();
        let bridge = bridge_to(&addr, ReadMode::UntilClose);

        let err = bridge.forward("hat").await.unwrap_err();
        assert_eq!(err.kind(), "connect");
        assert!(err.to_string().contains(&addr));
    }

    #[tokio::test]
    async fn unanswered_handshake_is_connect_error() {
        let connect = std::future::pending::<io::Result<TcpStream>>();

        let err = connect_within("10.0.0.1:3005", Duration::from_millis(20), connect)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "connect");
        assert_eq!(
            err.to_string(),
            "failed to connect to 10.0.0.1:3005: connect timed out after 20ms"
        );
    }

    #[tokio::test]
    async fn close_without_reply_is_closed_error() {
        let (addr, _downstream) = one_shot_downstream(b"").await;
        let bridge = bridge_to(&addr, ReadMode::UntilClose);

        let err = bridge.forward("hat").await.unwrap_err();
        assert!(matches!(err, BridgeError::Closed), "{err}");
    }

    #[tokio::test]
    async fn silent_downstream_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let _hold = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let mut bridge = bridge_to(&addr, ReadMode::UntilClose);
        bridge.exchange_timeout = Duration::from_millis(100);

        let err = bridge.forward("hat").await.unwrap_err();
        assert_eq!(err.kind(), "timeout");
        assert_eq!(err.to_string(), "downstream exchange timed out after 100ms");
    }

    #[tokio::test]
    async fn validation_rejects_non_json_reply() {
        let (addr, _downstream) = one_shot_downstream(b"<html>").await;
        let mut bridge = bridge_to(&addr, ReadMode::UntilClose);
        bridge.validate_response = true;

        let err = bridge.forward("hat").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_response");
    }

    #[tokio::test]
    async fn oversized_reply_is_rejected() {
        let mut reader: &[u8] = &[b'x'; 64];
        let err = read_until_close(&mut reader, 16).await.unwrap_err();
        assert!(matches!(err, BridgeError::ResponseTooLarge { limit: 16 }));

        let mut reader: &[u8] = &[b'x'; 64];
        let err = read_first_chunk(&mut reader, 16).await.unwrap_err();
        assert!(matches!(err, BridgeError::ResponseTooLarge { limit: 16 }));
    }

    #[tokio::test]
    async fn single_read_is_not_cut_at_chunk_size() {
        let reply = vec![b'x'; READ_CHUNK + 4096];
        let mut reader: &[u8] = &reply;

        let response = read_first_chunk(&mut reader, 1024 * 1024).await.unwrap();
        assert_eq!(response.len(), reply.len());
    }

    #[tokio::test]
    async fn until_close_joins_every_chunk() {
        let mut reader = two_chunks();
        let response = read_until_close(&mut reader, 1024).await.unwrap();
        assert_eq!(&response[..], b"{\"phonetic\":\"a-b\"}");
    }

    fn two_chunks() -> impl AsyncRead + Unpin {
        let first: &'static [u8] = b"{\"phonetic\":";
        let second: &'static [u8] = b"\"a-b\"}";
        first.chain(second)
    }
}
