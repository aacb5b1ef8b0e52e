use crate::config::{ServiceConfig, SupervisorConfig};
use crate::process::service_name::ServiceName;
use std::{collections::HashMap, path::PathBuf};

/// Everything needed to spawn one managed service.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableData {
    pub name: ServiceName,
    pub bin: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub working_dir: PathBuf,
    pub log_to_file: bool,
}

impl ExecutableData {
    pub fn new(name: ServiceName, bin: String) -> Self {
        ExecutableData {
            name,
            bin,
            args: Vec::default(),
            env: HashMap::default(),
            working_dir: PathBuf::from("."),
            log_to_file: false,
        }
    }

    pub fn with_args(self, args: Vec<String>) -> Self {
        Self { args, ..self }
    }

    pub fn with_env(self, env: HashMap<String, String>) -> Self {
        Self { env, ..self }
    }

    pub fn with_working_dir(self, working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            ..self
        }
    }

    pub fn with_log_to_file(self, log_to_file: bool) -> Self {
        Self {
            log_to_file,
            ..self
        }
    }

    /// Builds the executable data of a service, resolving its working directory against the
    /// supervisor root directory.
    pub fn from_config(
        name: ServiceName,
        service: &ServiceConfig,
        supervisor: &SupervisorConfig,
    ) -> Self {
        Self::new(name, service.command.bin().to_string())
            .with_args(service.command.args().to_vec())
            .with_env(service.env.clone())
            .with_working_dir(supervisor.working_dir(service))
            .with_log_to_file(service.log_to_file)
    }
}
