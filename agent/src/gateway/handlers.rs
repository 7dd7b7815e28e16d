//! Route handlers.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{Method, Uri};
use axum::response::Response;
use compose_agent_common::{
    ComposeDownOptions, ComposeStatusOptions, ComposeUpOptions, ErrorKind, HealthResponse,
};
use serde::de::DeserializeOwned;
use tracing::error;

use crate::application::ports::ComposeExecutor;
use crate::domain::ComposeAction;
use crate::gateway::GatewayState;
use crate::gateway::response::{self, ApiError};

pub const HEALTH_MESSAGE: &str = "Local Docker Compose Agent is running";

/// Liveness probe. Never authenticated.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: HEALTH_MESSAGE.to_string(),
    })
}

pub async fn compose_up<E: ComposeExecutor>(
    State(state): State<Arc<GatewayState<E>>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let opts: ComposeUpOptions = parse_body(body)?;
    dispatch(&state, ComposeAction::Up(opts)).await
}

pub async fn compose_down<E: ComposeExecutor>(
    State(state): State<Arc<GatewayState<E>>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let opts: ComposeDownOptions = parse_body(body)?;
    dispatch(&state, ComposeAction::Down(opts)).await
}

pub async fn compose_status<E: ComposeExecutor>(
    State(state): State<Arc<GatewayState<E>>>,
    query: Result<Query<ComposeStatusOptions>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(opts) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    dispatch(&state, ComposeAction::Status(opts)).await
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::new(ErrorKind::NotFound, format!("no route for {}", uri.path()))
}

/// Known path, wrong verb. axum still sets the `Allow` header.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        ErrorKind::MethodNotAllowed,
        format!("{method} is not allowed on {}", uri.path()),
    )
}

/// Parse an optional JSON body. Empty and `null` bodies mean "defaults".
fn parse_body<T: DeserializeOwned + Default>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, ApiError> {
    let bytes = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(&bytes)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::bad_request(format!("invalid request body: {e}")))
}

/// Runs on its own task: a dropped connection must not cancel a compose run
/// midway. The executor's timeout still bounds it.
async fn dispatch<E: ComposeExecutor>(
    state: &GatewayState<E>,
    action: ComposeAction,
) -> Result<Response, ApiError> {
    let executor = Arc::clone(&state.executor);
    let result = tokio::spawn(async move { executor.execute(action).await })
        .await
        .map_err(|e| {
            error!(action = action.name(), error = %e, "execution task failed");
            ApiError::new(ErrorKind::InternalError, "execution task failed")
        })?;
    Ok(response::execution(result))
}
