//! Unified error type for the wordduel server.

use wordduel_game::GameError;
use wordduel_protocol::ProtocolError;
use wordduel_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum WordDuelError {
    /// Connection-level failure (accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game rule rejected an operation.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Binding or serving the health listener failed.
    #[error("health listener: {0}")]
    Io(#[from] std::io::Error),
}
