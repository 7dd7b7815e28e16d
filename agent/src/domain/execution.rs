//! Outcome of one compose invocation.

use std::time::Duration;

use compose_agent_common::{ErrorKind, ExecutionResponse};

/// Result of a single execution. Built once, never mutated.
///
/// Fields are private so the only way to obtain a value is through the
/// constructors below, which keep `success()` true iff the process exited
/// with code 0 and no timeout or launch failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    command_line: String,
    working_directory: String,
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
    error: Option<ErrorKind>,
    message: Option<String>,
}

impl ExecutionResult {
    /// The process ran to completion. `exit_code` is `None` when it was
    /// terminated by a signal.
    #[must_use]
    pub fn completed(
        command_line: String,
        working_directory: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    ) -> Self {
        let (error, message) = match exit_code {
            Some(0) => (None, None),
            Some(code) => (
                Some(ErrorKind::CommandFailed),
                Some(format!("command exited with code {code}")),
            ),
            None => (
                Some(ErrorKind::CommandFailed),
                Some("command was terminated by a signal".to_string()),
            ),
        };
        Self {
            command_line,
            working_directory,
            stdout,
            stderr,
            exit_code,
            error,
            message,
        }
    }

    /// The process exceeded its timeout and was killed.
    #[must_use]
    pub fn timed_out(
        command_line: String,
        working_directory: String,
        timeout: Duration,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            command_line,
            working_directory,
            stdout,
            stderr,
            exit_code: None,
            error: Some(ErrorKind::Timeout),
            message: Some(format!(
                "command timed out after {}s",
                timeout.as_secs_f64()
            )),
        }
    }

    /// The working directory or compose command is unusable.
    #[must_use]
    pub fn configuration_error(
        command_line: String,
        working_directory: String,
        message: String,
    ) -> Self {
        Self::not_run(ErrorKind::ConfigurationError, command_line, working_directory, message)
    }

    /// The executable could not be started.
    #[must_use]
    pub fn launch_error(command_line: String, working_directory: String, message: String) -> Self {
        Self::not_run(ErrorKind::LaunchError, command_line, working_directory, message)
    }

    fn not_run(
        kind: ErrorKind,
        command_line: String,
        working_directory: String,
        message: String,
    ) -> Self {
        Self {
            command_line,
            working_directory,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            error: Some(kind),
            message: Some(message),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    #[must_use]
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    #[must_use]
    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<ExecutionResult> for ExecutionResponse {
    fn from(result: ExecutionResult) -> Self {
        Self {
            success: result.success(),
            command: result.command_line,
            working_directory: result.working_directory,
            stdout: result.stdout,
            stderr: result.stderr,
            return_code: result.exit_code,
            error: result.error,
            message: result.message,
        }
    }
}
