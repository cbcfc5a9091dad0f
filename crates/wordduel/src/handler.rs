//! Per-connection handler.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The task registers an outbound channel with the hub, then services two
//! sources until the peer goes away:
//!   1. inbound frames → decode → `Hub::dispatch`
//!   2. outbound events from the hub → encode → socket

use std::sync::Arc;

use tokio::sync::mpsc;
use wordduel_game::SolutionPicker;
use wordduel_protocol::{ClientEvent, Codec, ServerEvent, Sid};
use wordduel_transport::{Connection, TransportError};

use crate::WordDuelError;
use crate::server::ServerState;

/// Drop guard that takes a peer out of its room when the handler exits.
///
/// Runs on clean close, on error returns, and on panic. `Drop` is
/// synchronous, so the async lock happens in a spawned task.
struct PeerGuard<P: SolutionPicker> {
    sid: Sid,
    state: Arc<ServerState<P>>,
}

impl<P: SolutionPicker> Drop for PeerGuard<P> {
    fn drop(&mut self) {
        let sid = self.sid;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.hub.lock().await.disconnect(sid);
        });
    }
}

/// Handles a single connection from upgrade to close.
///
/// A clean hang-up from the peer needs no reply. Any other exit sends a
/// Close frame first, so the browser sees the socket end instead of
/// waiting on a dead one.
pub(crate) async fn handle_connection<C, P>(
    conn: C,
    state: Arc<ServerState<P>>,
) -> Result<(), WordDuelError>
where
    C: Connection<Error = TransportError>,
    P: SolutionPicker,
{
    let sid = Sid::from(conn.id());
    tracing::info!(%sid, "client connected");

    let (tx, mut rx) = mpsc::unbounded_channel();
    state.hub.lock().await.connect(sid, tx);
    let _guard = PeerGuard {
        sid,
        state: Arc::clone(&state),
    };

    let result = pump(&conn, &state, sid, &mut rx).await;
    if result.is_err() {
        if let Err(e) = conn.close().await {
            tracing::debug!(%sid, error = %e, "close failed");
        }
    }

    // _guard drops here → leave + unregister.
    result
}

/// Moves frames both ways until the peer goes away or a write fails.
async fn pump<C, P>(
    conn: &C,
    state: &ServerState<P>,
    sid: Sid,
    rx: &mut mpsc::UnboundedReceiver<ServerEvent>,
) -> Result<(), WordDuelError>
where
    C: Connection<Error = TransportError>,
    P: SolutionPicker,
{
    loop {
        tokio::select! {
            inbound = conn.recv() => match inbound {
                Ok(Some(data)) => handle_frame(state, sid, &data).await,
                Ok(None) => {
                    tracing::info!(%sid, "client disconnected");
                    return Ok(());
                }
                Err(e) => {
                    tracing::info!(%sid, error = %e, "client dropped");
                    return Ok(());
                }
            },
            Some(event) = rx.recv() => {
                let bytes = state.codec.encode(&event)?;
                conn.send(&bytes).await?;
            }
        }
    }
}

async fn handle_frame<P: SolutionPicker>(state: &ServerState<P>, sid: Sid, data: &[u8]) {
    let event: ClientEvent = match state.codec.decode(data) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(%sid, error = %e, "ignoring undecodable frame");
            return;
        }
    };
    tracing::debug!(%sid, event = event.name(), "event received");
    state.hub.lock().await.dispatch(sid, event);
}
