use std::fmt;

use serde::{Deserialize, Serialize};

// ===================================================================
// Request bodies
// ===================================================================

/// Body of `POST /docker/compose/up`.
///
/// Every field is optional on the wire; absent fields take the defaults
/// below. Unknown fields are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeUpOptions {
    /// Run containers in the background (`-d`). Default `true`.
    pub detached: bool,
    /// Build images before starting (`--build`). Default `false`.
    pub build: bool,
    /// Recreate containers even if unchanged (`--force-recreate`). Default `false`.
    pub force_recreate: bool,
}

impl Default for ComposeUpOptions {
    fn default() -> Self {
        Self {
            detached: true,
            build: false,
            force_recreate: false,
        }
    }
}

/// Body of `POST /docker/compose/down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeDownOptions {
    /// Remove named volumes (`-v`). Default `false`.
    #[serde(rename = "volumes")]
    pub remove_volumes: bool,
    /// Remove containers for services not in the compose file
    /// (`--remove-orphans`). Default `true`.
    pub remove_orphans: bool,
}

impl Default for ComposeDownOptions {
    fn default() -> Self {
        Self {
            remove_volumes: false,
            remove_orphans: true,
        }
    }
}

/// Output format requested from `compose ps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFormat {
    /// Plain `ps` table.
    #[default]
    Table,
    /// `ps --format json`.
    Json,
}

/// Query string of `GET /docker/compose/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeStatusOptions {
    pub format: StatusFormat,
}

// ===================================================================
// Error codes
// ===================================================================

/// Stable machine-readable error code carried in the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    BadRequest,
    ConfigurationError,
    LaunchError,
    Timeout,
    /// The process ran and exited non-zero. Not an HTTP error.
    CommandFailed,
    NotFound,
    MethodNotAllowed,
    InternalError,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
            Self::LaunchError => "launch_error",
            Self::Timeout => "timeout",
            Self::CommandFailed => "command_failed",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===================================================================
// Response bodies
// ===================================================================

/// Response of every compose route.
///
/// `stdout` and `stderr` are always present, even on failure.
/// `return_code` is `null` when the process never produced an exit code
/// (launch failure, timeout, killed by a signal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub success: bool,
    pub command: String,
    pub working_directory: String,
    pub stdout: String,
    pub stderr: String,
    pub return_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for requests rejected before any command runs
/// (authentication, malformed body, unknown route).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
