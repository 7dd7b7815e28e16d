//! Mapping from outcomes to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use compose_agent_common::{ErrorKind, ErrorResponse, ExecutionResponse};

use crate::domain::ExecutionResult;

/// HTTP status for an outcome.
///
/// A command that ran and exited non-zero is still a successful HTTP
/// transaction; the failure travels in the body's `success` field.
#[must_use]
pub fn status_for(kind: Option<ErrorKind>) -> StatusCode {
    match kind {
        None | Some(ErrorKind::CommandFailed) => StatusCode::OK,
        Some(ErrorKind::BadRequest) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::Unauthorized) => StatusCode::UNAUTHORIZED,
        Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
        Some(ErrorKind::MethodNotAllowed) => StatusCode::METHOD_NOT_ALLOWED,
        Some(ErrorKind::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        Some(
            ErrorKind::ConfigurationError | ErrorKind::LaunchError | ErrorKind::InternalError,
        ) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Serialize an execution result with its mapped status code.
#[must_use]
pub fn execution(result: ExecutionResult) -> Response {
    let status = status_for(result.error_kind());
    (status, Json(ExecutionResponse::from(result))).into_response()
}

/// A request rejected before any command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.kind,
            message: self.message,
        };
        (status_for(Some(self.kind)), Json(body)).into_response()
    }
}
