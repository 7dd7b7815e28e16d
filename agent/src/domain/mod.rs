//! Domain layer: pure types, rules and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::gateway`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod auth;
pub mod compose;
pub mod config;
pub mod error;
pub mod execution;

pub use auth::Authenticator;
pub use compose::ComposeAction;
pub use config::{AgentConfig, AuthConfig, DockerConfig, LoggingConfig, ServerConfig, TimeoutConfig};
pub use error::{AuthFailure, ConfigError};
pub use execution::ExecutionResult;
