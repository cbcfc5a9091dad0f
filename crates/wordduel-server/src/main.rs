//! wordduel server binary.
//!
//! Configuration comes from the environment:
//! - `WORDDUEL_BIND`: WebSocket listen address (default `127.0.0.1:8000`)
//! - `WORDDUEL_HEALTH_BIND`: health listen address (default
//!   `127.0.0.1:8001`, `off` to disable)
//! - `RUST_LOG`: log filter (default `info`)
//!
//! `GET /health` is served on the health address only. The game port
//! speaks WebSocket and nothing else, so point liveness probes at
//! `WORDDUEL_HEALTH_BIND`.

use wordduel::{ServerConfig, WordDuelError, WordDuelServerBuilder};

#[tokio::main]
async fn main() -> Result<(), WordDuelError> {
    wordduel::init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(bind = %config.bind_addr, health = ?config.health_addr, "starting wordduel");

    let server = WordDuelServerBuilder::from_config(config).build().await?;
    server.run().await
}
