//! HTTP gateway: routes, authentication layer, and response mapping.
//!
//! Routes:
//!   - `GET  /health`                 → liveness probe, no auth
//!   - `POST /docker/compose/up`      → `compose up`
//!   - `POST /docker/compose/down`    → `compose down`
//!   - `GET  /docker/compose/status`  → `compose ps`

pub mod auth;
pub mod handlers;
pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::application::ports::ComposeExecutor;
use crate::domain::Authenticator;

/// Shared, read-only state handed to every handler.
pub struct GatewayState<E> {
    pub authenticator: Authenticator,
    pub executor: Arc<E>,
}

impl<E: ComposeExecutor> GatewayState<E> {
    #[must_use]
    pub fn new(authenticator: Authenticator, executor: E) -> Self {
        Self {
            authenticator,
            executor: Arc::new(executor),
        }
    }
}

/// Build the axum router.
pub fn router<E: ComposeExecutor>(state: Arc<GatewayState<E>>) -> Router {
    let compose = Router::new()
        .route("/docker/compose/up", post(handlers::compose_up::<E>))
        .route("/docker/compose/down", post(handlers::compose_down::<E>))
        .route("/docker/compose/status", get(handlers::compose_status::<E>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_bearer::<E>,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(compose)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM, then drain in-flight requests.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("received shutdown signal");
}
