//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::gateway`, or `crate::output`.
//!
//! Async ports return `impl Future + Send` so generic callers can hand the
//! futures to a multi-threaded runtime.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;

use crate::domain::{AgentConfig, ComposeAction, ExecutionResult};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Raw outcome of a finished or killed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` if the process was killed or died from a signal.
    pub exit_code: Option<i32>,
    /// Everything read from stdout, partial when `timed_out`.
    pub stdout: Vec<u8>,
    /// Everything read from stderr, partial when `timed_out`.
    pub stderr: Vec<u8>,
    /// The timeout fired and the process group was killed.
    pub timed_out: bool,
}

/// Failures that prevent a process from running at all.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("working directory {} is not usable: {reason}", path.display())]
    WorkingDirectory { path: PathBuf, reason: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with discrete `args` inside `cwd`, capturing output.
    ///
    /// `cwd` is verified on every call. The process must be killed (with its
    /// process group) once `timeout` elapses; partial output is returned with
    /// `timed_out` set rather than as an error.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] if `cwd` is unusable or the process cannot be
    /// spawned or awaited.
    fn run_in(
        &self,
        cwd: &Path,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> impl Future<Output = Result<ProcessOutput, RunError>> + Send;
}

// ── Compose Executor Port ─────────────────────────────────────────────────────

/// What the HTTP gateway needs from the command-execution side.
pub trait ComposeExecutor: Send + Sync + 'static {
    /// Execute one compose intent. Never fails: every outcome, including
    /// launch and configuration problems, is an [`ExecutionResult`].
    fn execute(&self, action: ComposeAction) -> impl Future<Output = ExecutionResult> + Send;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Supplies the agent configuration at startup.
pub trait ConfigSource {
    /// Load and parse the configuration. Validation is the caller's job.
    fn load(&self) -> Result<AgentConfig>;

    /// Human-readable origin (usually a file path) for messages.
    fn origin(&self) -> String;
}
