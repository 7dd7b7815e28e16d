//! `compose-agent serve`

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::application::ports::ConfigSource;
use crate::application::services::ComposeService;
use crate::commands::load_config;
use crate::domain::Authenticator;
use crate::gateway::{self, GatewayState};
use crate::infra::{TokioCommandRunner, logging};

/// Load configuration, start logging, and serve until shutdown.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, logging cannot be
/// initialised, or the listener cannot be bound.
pub async fn run(source: &impl ConfigSource) -> Result<ExitCode> {
    let config = Arc::new(load_config(source)?);
    logging::init(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %source.origin(),
        bind = %config.bind_addr(),
        working_directory = %config.docker.working_directory.display(),
        compose_command = %config.docker.compose_command,
        serialize = config.docker.serialize,
        "compose-agent starting",
    );
    if !config.docker.working_directory.is_dir() {
        warn!(
            working_directory = %config.docker.working_directory.display(),
            "working directory does not exist yet; compose requests will fail until it does",
        );
    }

    let service = ComposeService::new(TokioCommandRunner::default(), Arc::clone(&config));
    let state = Arc::new(GatewayState::new(Authenticator::from_config(&config), service));

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = %listener.local_addr()?, "listening");

    gateway::serve(listener, gateway::router(state)).await?;

    info!("compose-agent shut down");
    Ok(ExitCode::SUCCESS)
}
