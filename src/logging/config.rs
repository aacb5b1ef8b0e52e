use serde::Deserialize;
use std::fmt::Debug;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::PrettyFields;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::file_logging::FileLoggingConfig;

/// An enum representing possible errors during the logging initialization.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("init logging error: `{0}`")]
    TryInitError(String),
    #[error("invalid logging file path: `{0}`")]
    InvalidFilePath(String),
    #[error("could not create logging file: `{0}`")]
    FileAppenderError(String),
}

/// Defines the logging configuration of the supervisor's own status lines.
///
/// Relayed output of the managed services is not affected by these settings: it is always
/// written to the supervisor stdout/stderr, tagged with the service name.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub(crate) format: LoggingFormat,
    #[serde(default)]
    pub(crate) level: LogLevel,
    #[serde(default)]
    pub(crate) file: FileLoggingConfig,
}

/// Represents a custom time stamp format for logging.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub(crate) struct TimestampFormat(pub(crate) String);

/// Default format based on
/// [chrono strftime](https://docs.rs/chrono/latest/chrono/format/strftime/index.html#fn7).
impl Default for TimestampFormat {
    fn default() -> Self {
        Self("%Y-%m-%dT%H:%M:%S".to_string())
    }
}

#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub(crate) struct LoggingFormat {
    #[serde(default)]
    pub(crate) target: bool,
    #[serde(default)]
    pub(crate) timestamp: TimestampFormat,
}

pub type FileLoggerGuard = Option<WorkerGuard>;

impl LoggingConfig {
    /// Attempts to initialize the global logging subscriber with the inner configuration.
    pub fn try_init(&self) -> Result<FileLoggerGuard, LoggingError> {
        let target = self.format.target;
        let timestamp_fmt = self.format.timestamp.0.clone();

        // The file layer and its worker guard only exist if file logging is enabled.
        let (file_layer, guard) =
            self.file
                .clone()
                .setup()?
                .map_or(Default::default(), |(file_writer, guard)| {
                    let file_layer = tracing_subscriber::fmt::layer()
                        .with_writer(file_writer)
                        .with_ansi(false)
                        .with_target(target)
                        .with_timer(ChronoLocal::new(timestamp_fmt.clone()))
                        .fmt_fields(PrettyFields::new())
                        .with_filter(self.logging_filter());
                    (Some(file_layer), Some(guard))
                });

        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(target)
            .with_timer(ChronoLocal::new(timestamp_fmt))
            .fmt_fields(PrettyFields::new())
            .with_filter(self.logging_filter());

        tracing_subscriber::Registry::default()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|_| {
                LoggingError::TryInitError(
                    "unable to set supervisor global logging subscriber".to_string(),
                )
            })?;

        debug!("Logging initialized successfully");
        Ok(guard)
    }

    fn logging_filter(&self) -> EnvFilter {
        let level = self.level.as_level().to_string().to_lowercase();

        let crate_directive = format!("backend_supervisor={}", level)
            .parse::<Directive>()
            // level is parsed by serde at config level, so the directive is always valid
            .unwrap_or_else(|_| {
                panic!(
                    "`logging_filter` returned an unparsable directive for level: {}",
                    level
                )
            });

        EnvFilter::builder()
            .with_default_directive(crate_directive)
            .with_env_var("LOG_LEVEL")
            .from_env_lossy()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) struct LogLevel(Level);

impl LogLevel {
    fn as_level(&self) -> Level {
        self.0
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self(Level::INFO)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value_str = String::deserialize(deserializer)?;
        Level::from_str(&value_str)
            .map(LogLevel)
            .map_err(serde::de::Error::custom)
    }
}
