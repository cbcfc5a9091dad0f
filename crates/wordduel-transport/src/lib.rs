//! Transport layer for wordduel.
//!
//! The game core never touches sockets. It only sees an opaque
//! [`ConnectionId`] per client, and the gateway moves frames through the
//! [`Transport`] and [`Connection`] traits defined here.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{PendingWebSocket, WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection.
///
/// Allocated from a process-wide counter when a client is accepted, so ids
/// are never reused and later connections sort after earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next unused id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming peers.
pub trait Transport: Send + Sync + 'static {
    /// An accepted peer whose protocol handshake has not run yet.
    type Incoming: Send + 'static;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer.
    ///
    /// Never waits on the peer itself, so one silent client cannot hold
    /// up the ones behind it.
    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error>;
}

/// A single bidirectional connection carrying whole frames.
///
/// Reading and writing are independent: a task may be parked in
/// [`recv`](Connection::recv) while another call to
/// [`send`](Connection::send) goes through.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one frame to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_round_trips() {
        assert_eq!(ConnectionId::new(42).into_inner(), 42);
    }

    #[test]
    fn test_next_is_increasing() {
        let a = ConnectionId::next();
        let b = ConnectionId::next();
        assert!(b > a);
        assert!(a.into_inner() > 0);
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_orders_by_allocation() {
        let mut ids = vec![ConnectionId::new(3), ConnectionId::new(1)];
        ids.sort();
        assert_eq!(ids, vec![ConnectionId::new(1), ConnectionId::new(3)]);
    }

    #[test]
    fn test_usable_as_map_key() {
        let mut seats = std::collections::HashMap::new();
        seats.insert(ConnectionId::new(1), "player");
        seats.insert(ConnectionId::new(2), "spectator");
        assert_eq!(seats[&ConnectionId::new(2)], "spectator");
    }
}
