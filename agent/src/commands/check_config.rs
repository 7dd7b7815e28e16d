//! `compose-agent check-config`

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::application::ports::ConfigSource;
use crate::commands::load_config;
use crate::domain::config::mask_token;
use crate::output::OutputContext;
use crate::output::human::HumanRenderer;
use crate::output::json;

/// Validate the configuration and print it with the token masked.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid.
pub fn run(ctx: &OutputContext, source: &impl ConfigSource) -> Result<ExitCode> {
    let config = load_config(source)?;

    if ctx.json {
        let mut shown = config.clone();
        shown.auth.token = mask_token(&shown.auth.token);
        let value = serde_json::json!({
            "valid": true,
            "origin": source.origin(),
            "config": serde_json::to_value(&shown).context("cannot serialize config")?,
        });
        println!("{}", json::pretty(&value)?);
    } else {
        HumanRenderer::new(ctx).render_config(&source.origin(), &config);
        if !config.docker.working_directory.is_dir() {
            ctx.warn(&format!(
                "{} does not exist on this host yet",
                config.docker.working_directory.display()
            ));
        }
    }
    Ok(ExitCode::SUCCESS)
}
