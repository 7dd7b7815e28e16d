//! Bearer-token route layer.
//!
//! Runs before any extractor of the wrapped routes, so a rejected request
//! never has its body parsed and never reaches the executor.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use compose_agent_common::ErrorKind;
use tracing::{debug, warn};

use crate::application::ports::ComposeExecutor;
use crate::gateway::GatewayState;
use crate::gateway::response::ApiError;

pub async fn require_bearer<E: ComposeExecutor>(
    State(state): State<Arc<GatewayState<E>>>,
    request: Request,
    next: Next,
) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // A non-UTF-8 header is treated like one with no scheme.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    match state.authenticator.verify(header) {
        Ok(()) => {
            debug!(%remote, path = %request.uri().path(), "authenticated request");
            next.run(request).await
        }
        Err(reason) => {
            warn!(%remote, path = %request.uri().path(), %reason, "unauthorized request");
            ApiError::new(ErrorKind::Unauthorized, reason.to_string()).into_response()
        }
    }
}
