use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::routing::get;
use axum::Router;

use boardrelay::auth::validators::{BoardAccessValidator, IdentityValidator};
use boardrelay::auth::AuthGate;
use boardrelay::config;
use boardrelay::logging;
use boardrelay::state::AppState;
use boardrelay::store::{RoomsStore, UsersStore};
use boardrelay::websocket::ws_handler;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load()?;
    let _logging_guard = logging::init(&cfg.logging);

    config::resolve_backend("users", &cfg.storage.users.kind);
    config::resolve_backend("rooms", &cfg.storage.rooms.kind);
    config::resolve_backend("cache", &cfg.cache.kind);

    let http_client = reqwest::Client::new();
    let validation = &cfg.apps.rest.validation;
    let identity = IdentityValidator::new(
        http_client.clone(),
        validation.jwt_header_name.clone(),
        validation.jwt_validation_url.clone(),
    );
    let board = BoardAccessValidator::new(
        http_client,
        validation.jwt_header_name.clone(),
        validation.board_validation_url.clone(),
    );
    let auth_gate = Arc::new(AuthGate::new(
        identity,
        board,
        Duration::from_secs(cfg.cache.ttl),
    ));

    let state = AppState::new(
        Arc::new(UsersStore::new()),
        Arc::new(RoomsStore::new()),
        auth_gate,
    );

    let app = Router::new()
        .route("/ping", get(ping))
        .route("/ws", get(ws_handler))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", cfg.apps.rest.port);
    tracing::info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn ping() -> &'static str {
    "pong"
}

/// Waits for `SIGINT` (Ctrl-C) or, on Unix, `SIGTERM`, so the server can
/// stop accepting new connections and let in-flight handlers finish before
/// exiting.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received, draining in-flight connections");
}
