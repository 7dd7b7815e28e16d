//! Application service: compose command execution use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All process I/O is routed through the injected `CommandRunner`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::ports::{CommandRunner, ComposeExecutor, RunError};
use crate::domain::compose::{build_argv, command_line};
use crate::domain::{AgentConfig, ComposeAction, ExecutionResult};

/// Translates compose intents into exactly one argv each and runs them in
/// the configured working directory.
pub struct ComposeService<R> {
    runner: R,
    config: Arc<AgentConfig>,
    /// Held for the whole execution when `docker.serialize` is on.
    gate: Option<Mutex<()>>,
}

impl<R: CommandRunner> ComposeService<R> {
    #[must_use]
    pub fn new(runner: R, config: Arc<AgentConfig>) -> Self {
        let gate = config.docker.serialize.then(|| Mutex::new(()));
        Self {
            runner,
            config,
            gate,
        }
    }

    /// Run one intent to completion, timeout, or launch failure.
    pub async fn run(&self, action: ComposeAction) -> ExecutionResult {
        let docker = &self.config.docker;
        let prefix = docker.compose_argv();
        let argv = build_argv(&prefix, &action);
        let command = command_line(&argv);
        let working_dir = docker.working_directory.display().to_string();

        let Some((program, args)) = prefix.first().map(|program| (*program, &argv[1..])) else {
            warn!("docker.compose_command is empty");
            return ExecutionResult::configuration_error(
                command,
                working_dir,
                "docker.compose_command is empty".to_string(),
            );
        };

        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        let timeout = action.timeout(&docker.timeouts);
        info!(
            action = action.name(),
            command = %command,
            working_directory = %working_dir,
            timeout_secs = timeout.as_secs(),
            "executing compose command",
        );

        let output = match self
            .runner
            .run_in(&docker.working_directory, program, args, timeout)
            .await
        {
            Ok(output) => output,
            Err(e @ RunError::WorkingDirectory { .. }) => {
                warn!(error = %e, "working directory check failed");
                return ExecutionResult::configuration_error(command, working_dir, e.to_string());
            }
            Err(e) => {
                warn!(error = %e, "compose command could not be launched");
                return ExecutionResult::launch_error(command, working_dir, e.to_string());
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.timed_out {
            warn!(
                action = action.name(),
                timeout_secs = timeout.as_secs(),
                "compose command timed out; process group killed",
            );
            return ExecutionResult::timed_out(command, working_dir, timeout, stdout, stderr);
        }

        let result = ExecutionResult::completed(command, working_dir, output.exit_code, stdout, stderr);
        if result.success() {
            info!(action = action.name(), "compose command succeeded");
        } else {
            warn!(
                action = action.name(),
                exit_code = ?result.exit_code(),
                "compose command failed",
            );
        }
        result
    }
}

impl<R: CommandRunner + 'static> ComposeExecutor for ComposeService<R> {
    async fn execute(&self, action: ComposeAction) -> ExecutionResult {
        self.run(action).await
    }
}
