//! Command handlers, one module per subcommand.

pub mod check_config;
pub mod remote;
pub mod serve;

use anyhow::{Context, Result};

use crate::application::ports::ConfigSource;
use crate::domain::AgentConfig;

/// Load the configuration and refuse to continue if it is invalid.
///
/// # Errors
///
/// Returns an error if the source cannot be read or fails validation.
pub fn load_config(source: &impl ConfigSource) -> Result<AgentConfig> {
    let config = source.load()?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", source.origin()))?;
    Ok(config)
}
