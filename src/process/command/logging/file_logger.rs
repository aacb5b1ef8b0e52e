use std::{io::Write, path::PathBuf};
use tracing::{level_filters::LevelFilter, subscriber::DefaultGuard};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt::format::{DefaultFields, Format, Full},
    FmtSubscriber,
};

use crate::process::command::error::CommandError;
use crate::process::service_name::ServiceName;

/// Stdout and stderr file loggers of one service.
pub(crate) struct FileSystemLoggers {
    out: FileLogger,
    err: FileLogger,
}

impl FileSystemLoggers {
    pub(crate) fn new(out: FileLogger, err: FileLogger) -> Self {
        Self { out, err }
    }

    pub(crate) fn into_loggers(self) -> (FileLogger, FileLogger) {
        (self.out, self.err)
    }
}

/// Hourly rolling file under `<path>/<service>/<prefix>.<date-hour>`.
pub struct FileAppender<W = RollingFileAppender>(W)
where
    W: Write + Send + 'static;

impl FileAppender<RollingFileAppender> {
    pub fn new(name: ServiceName, path: PathBuf, file_prefix: &str) -> Result<Self, CommandError> {
        let dir = path.join(name);
        RollingFileAppender::builder()
            .rotation(Rotation::HOURLY)
            .filename_prefix(file_prefix)
            .build(&dir)
            .map(Self)
            .map_err(|err| CommandError::FileLoggerError(format!("{}: {err}", dir.display())))
    }
}

impl<W> Write for FileAppender<W>
where
    W: Write + Send + 'static,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

#[derive(Debug)]
pub struct FileLogger {
    file_subscriber: FmtSubscriber<DefaultFields, Format<Full, ()>, LevelFilter, NonBlocking>,
    _guard: WorkerGuard,
}

pub struct ServiceLoggerGuard {
    _default_guard: DefaultGuard,
    _worker_guard: WorkerGuard,
}

impl FileLogger {
    /// Enables file logging for the current thread, replacing the global subscriber there.
    /// The global subscriber is restored when the returned guard is dropped.
    pub fn set_file_logging(self) -> ServiceLoggerGuard {
        let default_guard = tracing::subscriber::set_default(self.file_subscriber);
        ServiceLoggerGuard {
            _default_guard: default_guard,
            _worker_guard: self._guard,
        }
    }
}

impl<W> From<W> for FileLogger
where
    W: Write + Send + 'static,
{
    fn from(appender: W) -> Self {
        let (non_blocking, _guard) = tracing_appender::non_blocking(appender);
        // Only the raw line is written, the same text the service printed
        let file_subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_target(false)
            .with_level(false)
            .without_time()
            .with_writer(non_blocking)
            .finish();
        Self {
            file_subscriber,
            _guard,
        }
    }
}

/// Creates a new file logger for this service and file prefix
pub(crate) fn file_logger(
    name: ServiceName,
    path: PathBuf,
    prefix: &str,
) -> Result<FileLogger, CommandError> {
    Ok(FileAppender::new(name, path, prefix)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn creates_service_log_dir() {
        let logs_dir = tempfile::tempdir().unwrap();
        let logger = file_logger(
            ServiceName::Enrichment,
            logs_dir.path().to_path_buf(),
            "stdout.log",
        );
        assert!(logger.is_ok());
        assert!(logs_dir.path().join("enrichment").is_dir());
    }

    #[test]
    fn unusable_log_dir_is_an_error() {
        let logs_dir = tempfile::tempdir().unwrap();
        // the service folder can't be created under a regular file
        let not_a_dir = logs_dir.path().join("not-a-dir");
        std::fs::write(&not_a_dir, "").unwrap();

        assert_matches!(
            file_logger(ServiceName::Api, not_a_dir, "stdout.log"),
            Err(CommandError::FileLoggerError(_))
        );
    }
}
