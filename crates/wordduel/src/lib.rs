//! # wordduel
//!
//! Real-time two-player word duel server.
//!
//! Browsers connect over WebSocket, join a room by id, and race to find
//! the same hidden five-letter word. The first two connections in a room
//! are players, everyone after that watches. A small HTTP listener
//! answers `GET /health` for load balancers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wordduel::prelude::*;
//!
//! # async fn run() -> Result<(), WordDuelError> {
//! wordduel::init_tracing();
//! let server = WordDuelServer::builder()
//!     .bind("0.0.0.0:8000")
//!     .health_bind("0.0.0.0:8001")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod health;
mod hub;
mod server;

pub use config::ServerConfig;
pub use error::WordDuelError;
pub use health::router as health_router;
pub use hub::{Hub, PeerSender};
pub use server::{WordDuelServer, WordDuelServerBuilder};

/// Installs the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG` and falls back to `info`. Calling it a
/// second time is a no-op.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub mod prelude {
    pub use crate::{
        Hub, ServerConfig, WordDuelError, WordDuelServer, WordDuelServerBuilder,
    };
    pub use wordduel_game::{
        PlayerStatus, RandomPicker, Role, RoomRegistry, SolutionPicker, Word,
    };
    pub use wordduel_protocol::{
        ClientEvent, Codec, JsonCodec, LOBBY_ROOM_ID, MAX_GUESSES, MAX_PLAYERS, Mark, Recipient,
        RoomId, ServerEvent, Sid, WORD_LEN,
    };
}
