//! Bounded TCP accept for the converter service.
//!
//! A slot is taken before `accept` is called, so once `capacity`
//! conversions are in flight further peers queue in the kernel backlog
//! instead of being read.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("invalid bind address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to accept: {0}")]
    Accept(#[source] std::io::Error),

    #[error("listener closed")]
    Closed,
}

/// One accepted peer together with the slot it occupies.
#[derive(Debug)]
pub struct Accepted {
    pub stream: TcpStream,
    pub peer: SocketAddr,
    pub slot: Slot,
}

/// Held for as long as a peer is being served; dropping it frees the slot.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

pub struct Listener {
    socket: TcpListener,
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl Listener {
    /// Bind to `address`, serving at most `capacity` peers at once.
    pub async fn bind(address: &str, capacity: usize) -> Result<Self, ListenerError> {
        let addr: SocketAddr = address.parse().map_err(|source| ListenerError::Address {
            address: address.to_string(),
            source,
        })?;
        let socket = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %socket.local_addr().map_err(ListenerError::Bind)?,
            capacity,
            "Converter listener bound"
        );

        Ok(Self {
            socket,
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Wait for a free slot, then for a peer.
    pub async fn accept(&self) -> Result<Accepted, ListenerError> {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| ListenerError::Closed)?;
        let (stream, peer) = self.socket.accept().await.map_err(ListenerError::Accept)?;

        tracing::debug!(peer = %peer, free_slots = self.free_slots(), "Peer accepted");

        Ok(Accepted {
            stream,
            peer,
            slot: Slot { _permit: permit },
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    pub fn free_slots(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
