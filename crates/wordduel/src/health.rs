//! HTTP liveness endpoint.
//!
//! Served on its own listener so probes never touch the game socket.

use axum::{Json, Router, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::WordDuelError;

#[derive(Debug, Serialize)]
struct Health {
    ok: bool,
}

/// Router with a single route: `GET /health` → `{"ok":true}`.
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Health> {
    Json(Health { ok: true })
}

/// Serves [`router`] on `listener` until the process exits.
pub(crate) async fn serve(listener: TcpListener) -> Result<(), WordDuelError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "health endpoint listening");
    }
    axum::serve(listener, router()).await?;
    Ok(())
}
