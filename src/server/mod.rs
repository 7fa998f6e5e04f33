//! HTTP server module for the WebSocket hub.
//!
//! Serves the WebSocket upgrade at `/` and `/ws`, plus a health check.

pub mod routes;
pub mod state;
pub mod ws;

use crate::config::HubConfig;
use crate::error::HubError;
use crate::server::routes::health;
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Builds the router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS layer for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health::health_check))
        .layer(cors)
        .with_state(state)
}

/// Binds the listener for `config`. A failure here is fatal.
pub async fn bind(config: &HubConfig) -> Result<TcpListener, HubError> {
    let addr = config.bind_addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|source| HubError::Bind { addr, source })
}

/// Accepts connections on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), HubError> {
    let app = build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(())
}

/// Runs the hub until Ctrl-C or a listener failure.
pub async fn run(config: HubConfig) -> Result<(), HubError> {
    let state = Arc::new(AppState::new(&config));
    let listener = bind(&config).await?;

    match listener.local_addr() {
        Ok(addr) => tracing::info!("WebSocket hub listening on ws://{}", addr),
        Err(e) => tracing::warn!(error = %e, "Listening on unknown address"),
    }

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
