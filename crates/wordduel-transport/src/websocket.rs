//! WebSocket transport implementation using `tokio-tungstenite`.
//!
//! The upgraded stream is split so the read half and the write half sit
//! behind separate locks. A connection task can therefore wait on
//! [`recv`](Connection::recv) inside a `select!` without starving
//! outbound frames.

use std::net::SocketAddr;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, Transport, TransportError};

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;

/// A WebSocket-based [`Transport`] that listens for incoming connections.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self { listener })
    }

    /// Returns the address the listener is bound to.
    ///
    /// Useful after binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for WebSocketTransport {
    type Incoming = PendingWebSocket;
    type Error = TransportError;

    /// Returns as soon as a TCP peer is accepted. The WebSocket upgrade
    /// is left to [`PendingWebSocket::upgrade`].
    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::debug!(%addr, "accepted TCP peer");
        Ok(PendingWebSocket { stream, addr })
    }
}

/// An accepted TCP peer that has not sent its upgrade request yet.
pub struct PendingWebSocket {
    stream: TcpStream,
    addr: SocketAddr,
}

impl PendingWebSocket {
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the WebSocket handshake and allocates the connection id.
    ///
    /// Waits on the peer, so callers run it in the connection's own task
    /// and usually under a timeout.
    pub async fn upgrade(self) -> Result<WebSocketConnection, TransportError> {
        let ws = tokio_tungstenite::accept_async(self.stream)
            .await
            .map_err(|e| {
                TransportError::AcceptFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;

        let id = ConnectionId::next();
        tracing::debug!(%id, addr = %self.addr, "WebSocket upgraded");

        let (sink, stream) = ws.split();
        Ok(WebSocketConnection {
            id,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }
}

/// A single WebSocket connection.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    /// Sends `data` as a text frame when it is valid UTF-8, otherwise as
    /// a binary frame.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let msg = match std::str::from_utf8(data) {
            Ok(text) => Message::Text(text.to_owned().into()),
            Err(_) => Message::Binary(data.to_vec().into()),
        };
        self.sink.lock().await.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink.lock().await.close().await.map_err(|e| {
            TransportError::ConnectionClosed(e.to_string())
        })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
