//! `WordDuelServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → hub → game.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use wordduel_game::{RandomPicker, RoomRegistry, SolutionPicker};
use wordduel_protocol::JsonCodec;
use wordduel_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{Hub, ServerConfig, WordDuelError, health};

/// How long an accepted socket gets to finish the WebSocket upgrade.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after a failed accept before the next attempt.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Shared server state passed to each connection task.
pub(crate) struct ServerState<P: SolutionPicker> {
    pub(crate) hub: Mutex<Hub<P>>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a wordduel server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run() -> Result<(), wordduel::WordDuelError> {
/// use wordduel::{ServerConfig, WordDuelServerBuilder};
///
/// let server = WordDuelServerBuilder::from_config(ServerConfig::from_env())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct WordDuelServerBuilder<P: SolutionPicker = RandomPicker> {
    config: ServerConfig,
    picker: P,
}

impl WordDuelServerBuilder<RandomPicker> {
    /// Creates a builder with [`ServerConfig::default`] and random
    /// solutions.
    pub fn new() -> Self {
        Self::from_config(ServerConfig::default())
    }

    pub fn from_config(config: ServerConfig) -> Self {
        Self {
            config,
            picker: RandomPicker,
        }
    }
}

impl Default for WordDuelServerBuilder<RandomPicker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SolutionPicker> WordDuelServerBuilder<P> {
    /// Sets the WebSocket listen address.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the health listener address.
    pub fn health_bind(mut self, addr: &str) -> Self {
        self.config.health_addr = Some(addr.to_string());
        self
    }

    /// Runs without the health listener.
    pub fn without_health(mut self) -> Self {
        self.config.health_addr = None;
        self
    }

    /// Replaces where round solutions come from.
    pub fn solution_picker<Q: SolutionPicker>(self, picker: Q) -> WordDuelServerBuilder<Q> {
        WordDuelServerBuilder {
            config: self.config,
            picker,
        }
    }

    /// Binds every listener. Nothing is served until
    /// [`WordDuelServer::run`].
    pub async fn build(self) -> Result<WordDuelServer<P>, WordDuelError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let health = match &self.config.health_addr {
            Some(addr) => Some(TcpListener::bind(addr).await?),
            None => None,
        };

        let state = Arc::new(ServerState {
            hub: Mutex::new(Hub::new(RoomRegistry::with_picker(self.picker))),
            codec: JsonCodec,
        });

        Ok(WordDuelServer {
            transport,
            health,
            state,
        })
    }
}

/// A bound wordduel server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct WordDuelServer<P: SolutionPicker = RandomPicker> {
    transport: WebSocketTransport,
    health: Option<TcpListener>,
    state: Arc<ServerState<P>>,
}

impl WordDuelServer<RandomPicker> {
    pub fn builder() -> WordDuelServerBuilder {
        WordDuelServerBuilder::new()
    }
}

impl<P: SolutionPicker> WordDuelServer<P> {
    /// Address of the WebSocket listener.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Address of the health listener, if one is configured.
    pub fn health_addr(&self) -> Option<SocketAddr> {
        self.health.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Serves the health endpoint and accepts game connections until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), WordDuelError> {
        if let Some(listener) = self.health.take() {
            tokio::spawn(async move {
                if let Err(e) = health::serve(listener).await {
                    tracing::error!(error = %e, "health endpoint stopped");
                }
            });
        }

        if let Ok(addr) = self.transport.local_addr() {
            tracing::info!(%addr, "wordduel server running");
        }

        let state = self.state;
        accept_loop(&mut self.transport, |pending| {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let addr = pending.peer_addr();
                let conn = match tokio::time::timeout(HANDSHAKE_TIMEOUT, pending.upgrade()).await {
                    Ok(Ok(conn)) => conn,
                    Ok(Err(e)) => {
                        tracing::debug!(%addr, error = %e, "handshake failed");
                        return;
                    }
                    Err(_) => {
                        tracing::debug!(%addr, "handshake timed out");
                        return;
                    }
                };
                if let Err(e) = handle_connection(conn, state).await {
                    tracing::debug!(error = %e, "connection ended with error");
                }
            });
        })
        .await;
        Ok(())
    }
}

/// Hands every accepted peer to `on_accept`. Never returns.
///
/// Accept errors are usually resource exhaustion (`EMFILE`), so the loop
/// pauses before trying again.
async fn accept_loop<T: Transport>(transport: &mut T, mut on_accept: impl FnMut(T::Incoming)) {
    loop {
        match transport.accept().await {
            Ok(incoming) => on_accept(incoming),
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}
