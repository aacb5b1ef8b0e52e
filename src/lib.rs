pub mod cli;
pub mod config;
pub mod defaults;
pub mod event;
pub mod logging;
pub mod process;
pub mod supervisor;
pub mod utils;
