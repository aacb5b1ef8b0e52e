pub mod store;

use crate::logging::config::LoggingConfig;
use duration_str::deserialize_duration;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error loading config: `{0}`")]
    IOError(#[from] std::io::Error),

    #[error("error retrieving config: `{0}`")]
    ConfigError(#[from] config::ConfigError),

    #[error("invalid launch command: `{0}`")]
    InvalidLaunchCommand(String),
}

/// Supervisor configuration. Every path-dependent value is resolved against `root_dir`, which
/// is passed explicitly instead of being computed from the binary location.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SupervisorConfig {
    pub root_dir: PathBuf,

    #[serde(deserialize_with = "deserialize_duration")]
    pub api_start_delay: Duration,

    pub enrichment: ServiceConfig,

    pub api: ServiceConfig,

    pub services_log_dir: PathBuf,

    #[serde(default)]
    pub log: LoggingConfig,
}

/// How a managed service is launched.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ServiceConfig {
    pub working_dir: PathBuf,
    pub command: LaunchCommand,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub log_to_file: bool,
}

/// Argv list of a service. The first element is the binary, the rest are its arguments.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(try_from = "Vec<String>")]
pub struct LaunchCommand {
    bin: String,
    args: Vec<String>,
}

impl LaunchCommand {
    pub fn bin(&self) -> &str {
        &self.bin
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl TryFrom<Vec<String>> for LaunchCommand {
    type Error = ConfigError;

    fn try_from(argv: Vec<String>) -> Result<Self, Self::Error> {
        let mut argv = argv.into_iter();
        let bin = argv
            .next()
            .filter(|bin| !bin.trim().is_empty())
            .ok_or(ConfigError::InvalidLaunchCommand(
                "command must contain at least the binary to execute".to_string(),
            ))?;
        Ok(Self {
            bin,
            args: argv.collect(),
        })
    }
}

impl<const N: usize> TryFrom<[&str; N]> for LaunchCommand {
    type Error = ConfigError;

    fn try_from(argv: [&str; N]) -> Result<Self, Self::Error> {
        argv.into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
            .try_into()
    }
}

impl SupervisorConfig {
    /// Working directory of a service, joined to `root_dir` when it is relative.
    pub fn working_dir(&self, service: &ServiceConfig) -> PathBuf {
        self.root_dir.join(&service.working_dir)
    }
}
