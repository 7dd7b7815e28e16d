//! Infrastructure implementation of the `ConfigSource` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigSource;
use crate::domain::AgentConfig;

/// Environment variable that overrides the default config path.
pub const CONFIG_ENV: &str = "COMPOSE_AGENT_CONFIG";

/// Config file used when neither `--config` nor [`CONFIG_ENV`] is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Production `ConfigSource` that reads a YAML file from disk.
#[derive(Debug, Clone)]
pub struct YamlConfigSource {
    path: PathBuf,
}

impl YamlConfigSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the config path: explicit flag, then [`CONFIG_ENV`], then
    /// [`DEFAULT_CONFIG_FILE`] in the current directory.
    #[must_use]
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(val) if !val.is_empty() => Self::new(val),
            _ => Self::new(DEFAULT_CONFIG_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for YamlConfigSource {
    fn load(&self) -> Result<AgentConfig> {
        let path = &self.path;
        if !path.exists() {
            anyhow::bail!(
                "configuration file not found: {}\n\nCopy config.example.yml to {} and update it.",
                path.display(),
                path.display(),
            );
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}
