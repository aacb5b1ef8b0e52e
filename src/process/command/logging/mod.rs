pub mod file_logger;
pub mod logger;
pub mod thread;
