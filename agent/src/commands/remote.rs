//! `compose-agent remote`: drive a running agent over HTTP.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use compose_agent_common::{
    ComposeDownOptions, ComposeStatusOptions, ComposeUpOptions, StatusFormat,
};

use crate::client::{AgentClient, RemoteOutcome};
use crate::infra::logging;
use crate::output::OutputContext;
use crate::output::human::HumanRenderer;
use crate::output::json;

#[derive(Args)]
pub struct RemoteArgs {
    /// Base URL of the agent, e.g. <http://192.168.1.100:5050>
    #[arg(long, env = "COMPOSE_AGENT_URL")]
    pub url: String,

    /// Bearer token (not needed for `health`)
    #[arg(long, env = "COMPOSE_AGENT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: RemoteCommand,
}

#[derive(Subcommand)]
pub enum RemoteCommand {
    /// Check that the agent is reachable
    Health,

    /// Start the compose project
    Up(UpArgs),

    /// Stop the compose project
    Down(DownArgs),

    /// Show container status
    Status(StatusArgs),
}

#[derive(Args)]
pub struct UpArgs {
    /// Run in the foreground instead of passing `-d`
    #[arg(long)]
    pub attached: bool,

    /// Build images before starting
    #[arg(long)]
    pub build: bool,

    /// Recreate containers even if unchanged
    #[arg(long)]
    pub force_recreate: bool,
}

impl From<&UpArgs> for ComposeUpOptions {
    fn from(args: &UpArgs) -> Self {
        Self {
            detached: !args.attached,
            build: args.build,
            force_recreate: args.force_recreate,
        }
    }
}

#[derive(Args)]
pub struct DownArgs {
    /// Also remove named volumes
    #[arg(long)]
    pub volumes: bool,

    /// Leave containers of removed services running
    #[arg(long)]
    pub keep_orphans: bool,
}

impl From<&DownArgs> for ComposeDownOptions {
    fn from(args: &DownArgs) -> Self {
        Self {
            remove_volumes: args.volumes,
            remove_orphans: !args.keep_orphans,
        }
    }
}

#[derive(Args)]
pub struct StatusArgs {
    /// Ask compose for JSON instead of a table
    #[arg(long)]
    pub format_json: bool,
}

impl From<&StatusArgs> for ComposeStatusOptions {
    fn from(args: &StatusArgs) -> Self {
        let format = if args.format_json {
            StatusFormat::Json
        } else {
            StatusFormat::Table
        };
        Self { format }
    }
}

/// Run one remote command and map the agent's verdict to an exit code.
///
/// # Errors
///
/// Returns an error if the agent cannot be reached, no token is available
/// for a compose command, or the response cannot be understood.
pub async fn run(ctx: &OutputContext, args: RemoteArgs) -> Result<ExitCode> {
    logging::init_cli();

    let RemoteArgs {
        url,
        token,
        command,
    } = args;

    let outcome = match &command {
        RemoteCommand::Health => return health(ctx, &url, token).await,
        RemoteCommand::Up(up) => authed(&url, token)?.up(&up.into()).await?,
        RemoteCommand::Down(down) => authed(&url, token)?.down(&down.into()).await?,
        RemoteCommand::Status(status) => authed(&url, token)?.status(&status.into()).await?,
    };
    report(ctx, &outcome)
}

async fn health(ctx: &OutputContext, url: &str, token: Option<String>) -> Result<ExitCode> {
    let client = AgentClient::new(url, token.unwrap_or_default())?;
    let health = client.health().await?;
    if ctx.json {
        let value = serde_json::to_value(&health).context("cannot serialize health")?;
        println!("{}", json::pretty(&value)?);
    } else {
        HumanRenderer::new(ctx).render_health(&health);
    }
    Ok(ExitCode::SUCCESS)
}

fn authed(url: &str, token: Option<String>) -> Result<AgentClient> {
    let token = token
        .filter(|t| !t.is_empty())
        .context("a token is required: pass --token or set COMPOSE_AGENT_TOKEN")?;
    AgentClient::new(url, token)
}

fn report(ctx: &OutputContext, outcome: &RemoteOutcome) -> Result<ExitCode> {
    if ctx.json {
        println!("{}", json::pretty(&outcome.raw)?);
    } else {
        HumanRenderer::new(ctx).render_outcome(outcome);
    }
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
