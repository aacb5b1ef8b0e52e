use super::config::LoggingError;
use crate::defaults::{SUPERVISOR_LOG_DIR, SUPERVISOR_LOG_FILENAME};
use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

#[derive(Debug, Deserialize, Default, PartialEq, Clone)]
pub(crate) struct FileLoggingConfig {
    #[serde(default)]
    pub(crate) enable: bool,
    #[serde(default)]
    pub(crate) path: LogFilePath,
}

impl FileLoggingConfig {
    pub(super) fn setup(self) -> Result<Option<(NonBlocking, WorkerGuard)>, LoggingError> {
        if !self.enable {
            return Ok(None);
        }

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::HOURLY)
            .filename_prefix(self.path.file_name.to_string_lossy())
            .build(&self.path.parent)
            .map_err(|err| {
                LoggingError::FileAppenderError(format!("{}: {err}", self.path.parent.display()))
            })?;
        Ok(Some(tracing_appender::non_blocking(file_appender)))
    }
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(try_from = "PathBuf")]
pub(crate) struct LogFilePath {
    parent: PathBuf,
    file_name: PathBuf,
}

impl Default for LogFilePath {
    fn default() -> Self {
        Self {
            parent: PathBuf::from(SUPERVISOR_LOG_DIR),
            file_name: PathBuf::from(SUPERVISOR_LOG_FILENAME),
        }
    }
}

impl TryFrom<PathBuf> for LogFilePath {
    type Error = LoggingError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        let parent = value
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or(LoggingError::InvalidFilePath(
                "file path provided must have a valid parent directory".into(),
            ))?
            .into();
        let file_name = value
            .file_name()
            .ok_or(LoggingError::InvalidFilePath(
                "file path provided must have a valid file name".into(),
            ))?
            .into();
        Ok(Self { parent, file_name })
    }
}
