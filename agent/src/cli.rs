//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::infra::YamlConfigSource;
use crate::output::OutputContext;

/// Run docker compose on this host from authenticated HTTP requests
#[derive(Parser)]
#[command(
    name = "compose-agent",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file (default: $COMPOSE_AGENT_CONFIG, then ./config.yml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP agent
    Serve,

    /// Validate the configuration file and print the effective settings
    CheckConfig,

    /// Talk to a running agent
    Remote(commands::remote::RemoteArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, serving, or a remote call fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            config,
            json,
            quiet,
            no_color,
            command,
        } = self;
        let source = YamlConfigSource::resolve(config.as_deref());
        match command {
            Command::Serve => commands::serve::run(&source).await,
            Command::CheckConfig => {
                let ctx = OutputContext::new(no_color, quiet, json);
                commands::check_config::run(&ctx, &source)
            }
            Command::Remote(args) => {
                let ctx = OutputContext::new(no_color, quiet, json);
                commands::remote::run(&ctx, args).await
            }
        }
    }
}
