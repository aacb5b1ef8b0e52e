pub mod command_os;
pub mod error;
pub mod executable_data;
pub mod exit_code;
pub mod logging;
pub mod shutdown;
