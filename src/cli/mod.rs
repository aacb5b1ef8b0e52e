mod one_shot_operation;

use clap::Parser;
use one_shot_operation::OneShotOperation;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::{
    config::{store::SupervisorConfigStore, ConfigError, SupervisorConfig},
    defaults::DEFAULT_CONFIG_PATH,
    logging::config::{FileLoggerGuard, LoggingError},
    utils::binary_metadata::binary_metadata,
};

/// Represents all the data structures that can be created from the CLI
#[derive(Debug)]
pub struct SupervisorCliConfig {
    pub config: SupervisorConfig,
    pub file_logger_guard: FileLoggerGuard,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Could not read supervisor config: `{0}`")]
    ConfigRead(#[from] ConfigError),
    #[error("Could not initialize logging: `{0}`")]
    LoggingInit(#[from] LoggingError),
}

/// What action was requested from the CLI?
#[derive(Debug)]
pub enum CliCommand {
    /// Normal operation requested. Get the required config and continue.
    InitSupervisor(SupervisorCliConfig),
    /// Do an "one-shot" operation and exit successfully.
    Quit(OneShotOperation),
}

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)] // Read from `Cargo.toml`
pub struct Cli {
    /// Path to the YAML configuration file. A missing file is not an error.
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Prints the CLI arguments and the resolved configuration, then exits.
    #[arg(long)]
    print_debug_info: bool,

    #[arg(long)]
    version: bool,
}

impl Cli {
    /// Parses command line arguments and decides how the application runs
    pub fn init() -> Result<CliCommand, CliError> {
        Self::parse().into_command()
    }

    fn into_command(self) -> Result<CliCommand, CliError> {
        // If the version flag is set, print the version and exit
        if self.print_version() {
            return Ok(CliCommand::Quit(OneShotOperation::PrintVersion));
        }

        let config_storer = SupervisorConfigStore::new(&self.get_config_path())?;

        let config = config_storer.load().inspect_err(|err| {
            println!(
                "Could not read supervisor config from {}: {}",
                config_storer.config_path().to_string_lossy(),
                err
            )
        })?;

        if self.print_debug_info() {
            return Ok(CliCommand::Quit(OneShotOperation::PrintDebugInfo(
                self,
                Box::new(config),
            )));
        }

        let file_logger_guard = config.log.try_init()?;
        info!("{}", binary_metadata());
        info!(
            "Starting backend supervisor with config '{}'",
            config_storer.config_path().to_string_lossy()
        );

        Ok(CliCommand::InitSupervisor(SupervisorCliConfig {
            config,
            file_logger_guard,
        }))
    }

    fn get_config_path(&self) -> PathBuf {
        PathBuf::from(&self.config)
    }

    fn print_version(&self) -> bool {
        self.version
    }

    fn print_debug_info(&self) -> bool {
        self.print_debug_info
    }
}
