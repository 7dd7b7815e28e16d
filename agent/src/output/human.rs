//! Human-readable terminal renderer.

use compose_agent_common::{ExecutionResponse, HealthResponse};

use crate::client::{ComposeReply, RemoteOutcome};
use crate::domain::AgentConfig;
use crate::domain::config::mask_token;
use crate::output::OutputContext;

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_health(&self, health: &HealthResponse) {
        self.ctx
            .success(&format!("{} ({})", health.message, health.status));
    }

    pub fn render_outcome(&self, outcome: &RemoteOutcome) {
        match &outcome.reply {
            ComposeReply::Executed(resp) => self.render_execution(outcome.status, resp),
            ComposeReply::Rejected(err) => {
                self.ctx
                    .error(&format!("HTTP {}: {} ({})", outcome.status, err.message, err.error));
            }
        }
    }

    fn render_execution(&self, status: u16, resp: &ExecutionResponse) {
        self.ctx.kv("Command:", &resp.command);
        self.ctx.kv("Directory:", &resp.working_directory);
        let code = resp
            .return_code
            .map_or_else(|| "none".to_string(), |c| c.to_string());
        self.ctx.kv("Exit code:", &code);

        if !resp.stdout.is_empty() {
            self.ctx.header("stdout:");
            self.ctx.block(&resp.stdout);
        }
        if !resp.stderr.is_empty() {
            self.ctx.header("stderr:");
            self.ctx.block(&resp.stderr);
        }

        if resp.success {
            self.ctx.success("Command succeeded");
        } else {
            let detail = resp.message.as_deref().unwrap_or("command failed");
            let kind = resp.error.map_or("command_failed", |k| k.as_str());
            self.ctx.error(&format!("HTTP {status}: {detail} ({kind})"));
        }
    }

    /// Render the effective configuration with the token masked.
    pub fn render_config(&self, origin: &str, config: &AgentConfig) {
        self.ctx.header(&format!("Configuration: {origin}"));
        self.ctx.kv("Listen:", &config.bind_addr());
        self.ctx.kv("Token:", &mask_token(&config.auth.token));
        self.ctx.kv(
            "Working directory:",
            &config.docker.working_directory.display().to_string(),
        );
        self.ctx.kv("Compose command:", &config.docker.compose_command);
        let t = &config.docker.timeouts;
        self.ctx.kv(
            "Timeouts:",
            &format!("up {}s, down {}s, status {}s", t.up_secs, t.down_secs, t.status_secs),
        );
        self.ctx.kv(
            "Serialize:",
            if config.docker.serialize { "yes" } else { "no" },
        );
        let log_file = config
            .logging
            .file
            .as_ref()
            .map_or_else(|| "stdout only".to_string(), |p| p.display().to_string());
        self.ctx
            .kv("Logging:", &format!("{} ({log_file})", config.logging.level));
        self.ctx.success("Configuration is valid");
    }
}
