use std::fmt::Debug;
use thiserror::Error;

use crate::process::service_name::ServiceName;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0} not piped")]
    StreamPipeError(String),

    #[error("could not create service log file: {0}")]
    FileLoggerError(String),

    #[error("{0} is already started")]
    AlreadyStarted(ServiceName),

    #[error("{0}")]
    IOError(#[from] std::io::Error),

    #[error("could not signal process: {0}")]
    NixError(String),

    #[error("{0}")]
    Unsupported(String),
}
