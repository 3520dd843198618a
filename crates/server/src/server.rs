use axum::{Router, routing::get};

use std::sync::Arc;

use crate::export;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn health() -> &'static str {
    "ok"
}

/// Build the application router.
///
/// Export routes live under `api_prefix` (`"/api"` gives
/// `/api/export/transactions`); an empty prefix mounts them at the root.
pub fn app(engine: Engine, api_prefix: &str) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    let exports = Router::new()
        .route("/export/transactions", get(export::transactions))
        .route("/export/expenses", get(export::expenses))
        .route("/export/other", get(export::other));

    let prefix = api_prefix.trim().trim_matches('/');
    let routes = if prefix.is_empty() {
        exports
    } else {
        Router::new().nest(&format!("/{prefix}"), exports)
    };

    routes.route("/health", get(health)).with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    api_prefix: &str,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, api_prefix)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    api_prefix: &str,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;
    let api_prefix = api_prefix.to_string();

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, &api_prefix, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
