use super::{ConfigError, SupervisorConfig};
use crate::defaults::{
    API_COMMAND, API_WORKING_DIR, DEFAULT_API_START_DELAY, DEFAULT_ROOT_DIR, ENRICHMENT_COMMAND,
    ENRICHMENT_WORKING_DIR, ENV_VAR_PREFIX, SERVICES_LOG_DIR,
};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Loads the [SupervisorConfig] from the built-in defaults, an optional YAML file and the
/// environment, in increasing order of precedence.
pub struct SupervisorConfigStore {
    config_path: PathBuf,
    config_builder: ConfigBuilder<DefaultState>,
}

impl SupervisorConfigStore {
    pub fn new(file_path: &Path) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("root_dir", DEFAULT_ROOT_DIR)?
            .set_default("api_start_delay", DEFAULT_API_START_DELAY)?
            .set_default("services_log_dir", SERVICES_LOG_DIR)?
            .set_default("enrichment.working_dir", ENRICHMENT_WORKING_DIR)?
            .set_default("enrichment.command", ENRICHMENT_COMMAND.to_vec())?
            .set_default("api.working_dir", API_WORKING_DIR)?
            .set_default("api.command", API_COMMAND.to_vec())?
            // The file is optional, so the supervisor can run with defaults and env vars only
            .add_source(File::new(&file_path.to_string_lossy(), FileFormat::Yaml).required(false))
            // Eg. `BACKEND_SUPERVISOR_API_START_DELAY=5s` sets `api_start_delay` and
            // `BACKEND_SUPERVISOR_API__COMMAND="node dist/server.js"` sets `api.command`
            .add_source(
                Environment::with_prefix(ENV_VAR_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("enrichment.command")
                    .with_list_parse_key("api.command"),
            );

        Ok(Self {
            config_path: file_path.to_path_buf(),
            config_builder,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<SupervisorConfig, ConfigError> {
        Ok(self
            .config_builder
            // `build_cloned` performs all the I/O operations from a reference to the builder
            .build_cloned()?
            .try_deserialize::<SupervisorConfig>()?)
    }
}
