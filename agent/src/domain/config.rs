//! Domain types and validators for the agent configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Shortest accepted `auth.token`.
pub const MIN_TOKEN_LEN: usize = 16;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_COMPOSE_COMMAND: &str = "docker compose";

pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, loaded once at startup and never mutated.
///
/// Unknown keys are ignored so older agents accept newer config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Shared bearer secret.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &mask_token(&self.token))
            .finish()
    }
}

/// Where and how compose commands run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    pub working_directory: PathBuf,
    /// Command prefix, split on whitespace: the first token is the program.
    #[serde(default = "default_compose_command")]
    pub compose_command: String,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Serialize executions against the working directory.
    #[serde(default = "default_true")]
    pub serialize: bool,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            working_directory: PathBuf::new(),
            compose_command: default_compose_command(),
            timeouts: TimeoutConfig::default(),
            serialize: true,
        }
    }
}

/// Per-intent subprocess timeouts, in seconds. All must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_up_secs")]
    pub up_secs: u64,
    #[serde(default = "default_down_secs")]
    pub down_secs: u64,
    #[serde(default = "default_status_secs")]
    pub status_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            up_secs: default_up_secs(),
            down_secs: default_down_secs(),
            status_secs: default_status_secs(),
        }
    }
}

impl TimeoutConfig {
    #[must_use]
    pub fn up(&self) -> Duration {
        Duration::from_secs(self.up_secs)
    }

    #[must_use]
    pub fn down(&self) -> Duration {
        Duration::from_secs(self.down_secs)
    }

    #[must_use]
    pub fn status(&self) -> Duration {
        Duration::from_secs(self.status_secs)
    }
}

/// Log verbosity and optional log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Normalised filter directive for `level`.
    ///
    /// Accepts any case and the `WARNING`/`CRITICAL` spellings used by
    /// other logging stacks.
    #[must_use]
    pub fn filter_directive(&self) -> Option<&'static str> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some("trace"),
            "debug" => Some("debug"),
            "info" => Some("info"),
            "warn" | "warning" => Some("warn"),
            "error" | "critical" => Some("error"),
            _ => None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_compose_command() -> String {
    DEFAULT_COMPOSE_COMMAND.to_string()
}

fn default_true() -> bool {
    true
}

fn default_up_secs() -> u64 {
    120
}

fn default_down_secs() -> u64 {
    60
}

fn default_status_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Behaviour ────────────────────────────────────────────────────────────────

impl AgentConfig {
    /// Reject configurations the agent must not start with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checked in file order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        validate_token(&self.auth.token)?;
        if self.docker.working_directory.as_os_str().is_empty() {
            return Err(ConfigError::MissingWorkingDirectory);
        }
        if self.docker.compose_command.split_whitespace().next().is_none() {
            return Err(ConfigError::EmptyComposeCommand);
        }
        let t = &self.docker.timeouts;
        for (which, secs) in [
            ("up_secs", t.up_secs),
            ("down_secs", t.down_secs),
            ("status_secs", t.status_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ZeroTimeout { which });
            }
        }
        if self.logging.filter_directive().is_none() {
            return Err(ConfigError::UnknownLogLevel(self.logging.level.clone()));
        }
        Ok(())
    }

    /// `host:port` suitable for binding; IPv6 literals are bracketed.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        let host = self.server.host.trim();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.server.port)
        } else {
            format!("{host}:{}", self.server.port)
        }
    }
}

impl DockerConfig {
    /// The compose command split into argv tokens (`["docker", "compose"]`).
    #[must_use]
    pub fn compose_argv(&self) -> Vec<&str> {
        self.compose_command.split_whitespace().collect()
    }
}

/// Validates the bearer secret.
///
/// # Errors
///
/// Returns an error if the token is empty, shorter than [`MIN_TOKEN_LEN`],
/// or contains whitespace.
pub fn validate_token(token: &str) -> Result<(), ConfigError> {
    if token.is_empty() {
        return Err(ConfigError::MissingToken { min: MIN_TOKEN_LEN });
    }
    if token.chars().any(char::is_whitespace) {
        return Err(ConfigError::TokenContainsWhitespace);
    }
    let len = token.chars().count();
    if len < MIN_TOKEN_LEN {
        return Err(ConfigError::TokenTooShort {
            len,
            min: MIN_TOKEN_LEN,
        });
    }
    Ok(())
}

/// Render a token for display: first four characters, the rest starred.
#[must_use]
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "(unset)".to_string();
    }
    let visible: String = token.chars().take(4).collect();
    format!("{visible}****")
}

// ── Unit tests ───────────────────────────────────────────────────────────────
