//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use phonetic_relay::bridge::ConversionRequest;
use phonetic_relay::config::validation::validate_config;
use phonetic_relay::config::RelayConfig;
use phonetic_relay::http::HttpServer;
use phonetic_relay::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What a mock downstream does with one request.
pub enum Reply {
    /// Write these bytes, then close.
    Bytes(Vec<u8>),
    /// Hold the connection open without answering.
    Silent,
    /// Close without writing anything.
    Close,
}

/// A running mock downstream.
pub struct MockDownstream {
    pub addr: SocketAddr,
    connections: Arc<AtomicUsize>,
}

impl MockDownstream {
    /// Connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

/// Start a programmable downstream; `f` decides the reply per request.
pub async fn start_downstream<F, Fut>(f: F) -> MockDownstream
where
    F: Fn(ConversionRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        match f(request).await {
                            Reply::Bytes(bytes) => {
                                let _ = socket.write_all(&bytes).await;
                                let _ = socket.shutdown().await;
                            }
                            Reply::Silent => {
                                tokio::time::sleep(Duration::from_secs(30)).await;
                            }
                            Reply::Close => {
                                let _ = socket.shutdown().await;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockDownstream { addr, connections }
}

/// Downstream that answers `{"echo": <text>}`.
pub async fn start_echo_downstream() -> MockDownstream {
    start_downstream(|request| async move {
        let body = serde_json::json!({ "echo": request.text });
        Reply::Bytes(serde_json::to_vec(&body).unwrap())
    })
    .await
}

/// Downstream that always answers with `body`.
pub async fn start_fixed_downstream(body: &'static [u8]) -> MockDownstream {
    start_downstream(move |_| async move { Reply::Bytes(body.to_vec()) }).await
}

/// Read until the bytes parse as a request (the bridge sends no framing).
async fn read_request(socket: &mut TcpStream) -> Option<ConversionRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Ok(request) = serde_json::from_slice(&buf) {
            return Some(request);
        }
    }
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap()
}

/// Static site with an index, a stylesheet and a plain page.
pub fn static_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html><body>convert</body></html>").unwrap();
    std::fs::write(dir.path().join("style.css"), "body { margin: 0; }").unwrap();
    std::fs::write(dir.path().join("about.html"), "<p>about</p>").unwrap();
    dir
}

/// Relay configuration pointing at `downstream` and serving `static_root`.
pub fn relay_config(downstream: SocketAddr, static_root: &Path) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.downstream.host = downstream.ip().to_string();
    config.downstream.port = downstream.port();
    config.static_files.root = static_root.to_path_buf();
    config.timeouts.connect_secs = 2;
    config.timeouts.exchange_secs = 5;
    config.timeouts.request_secs = 10;
    config
}

/// Start the relay on an ephemeral port. The config must pass validation.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    validate_config(&config).unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
