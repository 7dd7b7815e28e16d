//! The three whitelisted compose intents and their argument construction.
//!
//! Request options only toggle the presence of fixed literal flags; nothing
//! from a request body ever becomes argv text.

use std::time::Duration;

use compose_agent_common::{ComposeDownOptions, ComposeStatusOptions, ComposeUpOptions, StatusFormat};

use crate::domain::config::TimeoutConfig;

/// A validated intent: exactly one compose subcommand plus its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Up(ComposeUpOptions),
    Down(ComposeDownOptions),
    Status(ComposeStatusOptions),
}

impl ComposeAction {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Up(_) => "up",
            Self::Down(_) => "down",
            Self::Status(_) => "status",
        }
    }

    /// Arguments appended after the configured compose command prefix.
    ///
    /// Flag order is fixed so identical requests produce identical argv.
    #[must_use]
    pub fn args(&self) -> Vec<&'static str> {
        match self {
            Self::Up(opts) => {
                let mut args = vec!["up"];
                if opts.detached {
                    args.push("-d");
                }
                if opts.build {
                    args.push("--build");
                }
                if opts.force_recreate {
                    args.push("--force-recreate");
                }
                args
            }
            Self::Down(opts) => {
                let mut args = vec!["down"];
                if opts.remove_volumes {
                    args.push("-v");
                }
                if opts.remove_orphans {
                    args.push("--remove-orphans");
                }
                args
            }
            Self::Status(opts) => match opts.format {
                StatusFormat::Table => vec!["ps"],
                StatusFormat::Json => vec!["ps", "--format", "json"],
            },
        }
    }

    /// Timeout that applies to this intent.
    #[must_use]
    pub fn timeout(&self, timeouts: &TimeoutConfig) -> Duration {
        match self {
            Self::Up(_) => timeouts.up(),
            Self::Down(_) => timeouts.down(),
            Self::Status(_) => timeouts.status(),
        }
    }
}

/// Full argv: compose prefix tokens followed by the intent's arguments.
#[must_use]
pub fn build_argv<'a>(prefix: &[&'a str], action: &ComposeAction) -> Vec<&'a str> {
    prefix.iter().copied().chain(action.args()).collect()
}

/// Human-readable command line echoed back to callers.
#[must_use]
pub fn command_line(argv: &[&str]) -> String {
    argv.join(" ")
}
