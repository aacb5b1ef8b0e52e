pub const SUPERVISOR_NAME: &str = "backend-supervisor";

// Config
pub const DEFAULT_CONFIG_PATH: &str = "backend-supervisor.yaml";
pub const ENV_VAR_PREFIX: &str = "BACKEND_SUPERVISOR";
pub const DEFAULT_ROOT_DIR: &str = ".";
pub const DEFAULT_API_START_DELAY: &str = "3s";

// Managed services
pub const ENRICHMENT_WORKING_DIR: &str = "enrichment-service";
pub const ENRICHMENT_COMMAND: [&str; 2] = ["python3", "main.py"];
pub const API_WORKING_DIR: &str = "backend";
pub const API_COMMAND: [&str; 2] = ["node", "server.js"];

// Logging
cfg_if::cfg_if! {
    if #[cfg(target_os = "macos")] {
        pub const SUPERVISOR_LOG_DIR: &str = "/opt/homebrew/var/log/backend-supervisor";
        pub const SERVICES_LOG_DIR: &str = "/opt/homebrew/var/log/backend-supervisor/services";
    } else {
        pub const SUPERVISOR_LOG_DIR: &str = "/var/log/backend-supervisor";
        pub const SERVICES_LOG_DIR: &str = "/var/log/backend-supervisor/services";
    }
}
pub const SUPERVISOR_LOG_FILENAME: &str = "backend-supervisor.log";
pub const STDOUT_LOG_PREFIX: &str = "stdout.log";
pub const STDERR_LOG_PREFIX: &str = "stderr.log";
