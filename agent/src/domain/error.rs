//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Reasons an `AgentConfig` is refused at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("auth.token is not set. Generate a random secret of at least {min} characters.")]
    MissingToken { min: usize },

    #[error("auth.token is too short ({len} characters); at least {min} are required.")]
    TokenTooShort { len: usize, min: usize },

    #[error("auth.token must not contain whitespace.")]
    TokenContainsWhitespace,

    #[error("docker.working_directory is not set.")]
    MissingWorkingDirectory,

    #[error("docker.compose_command is empty.")]
    EmptyComposeCommand,

    #[error("docker.timeouts.{which} must be greater than zero.")]
    ZeroTimeout { which: &'static str },

    #[error("Unknown logging.level '{0}'.\n\nValid levels: trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("server.port must not be 0.")]
    ZeroPort,
}

// ── Auth errors ───────────────────────────────────────────────────────────────

/// Why an `Authorization` header was rejected.
///
/// Only used for logging; every variant produces the same 401 on the wire.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("missing Authorization header")]
    Missing,

    #[error("invalid Authorization format, expected: Bearer <token>")]
    Malformed,

    #[error("invalid authorization token")]
    InvalidToken,

    #[error("no auth token configured")]
    NotConfigured,
}
