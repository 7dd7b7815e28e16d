//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution,
//! configuration file access, and log subscriber setup.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::gateway` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod logging;

pub use command_runner::TokioCommandRunner;
pub use config::YamlConfigSource;
