use super::file_logger::FileLogger;
use crate::process::service_name::ServiceName;
use crate::utils::threads::spawn_named_thread;
use crossbeam::channel::Receiver;
use std::io::{self, Write};
use std::thread::JoinHandle;
use tracing::{debug, info};

/// Supervisor stream a service stream is relayed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConsoleStream {
    Stdout,
    Stderr,
}

pub(crate) enum Logger {
    Console(ConsoleStream, ServiceName),
    File(FileLogger),
}

impl Logger {
    pub(crate) fn log<S>(self, rx: Receiver<S>) -> JoinHandle<()>
    where
        S: AsRef<str> + Send + 'static,
    {
        spawn_named_thread("Service output logger", move || match self {
            Self::Console(stream, name) => {
                rx.iter().for_each(|line| {
                    let line = line.as_ref();
                    let result = match stream {
                        ConsoleStream::Stdout => write_tagged(&mut io::stdout().lock(), name, line),
                        ConsoleStream::Stderr => write_tagged(&mut io::stderr().lock(), name, line),
                    };
                    if let Err(err) = result {
                        debug!(service = %name, "could not relay output line: {err}");
                    }
                });
            }
            Self::File(file_logger) => {
                // `_guard` keeps the file subscriber as default for this thread
                let _guard = file_logger.set_file_logging();
                rx.iter().for_each(|line| info!("{}", line.as_ref()));
            }
        })
    }
}

/// Writes `[<name>] <line>` followed by a newline as a single write to the locked stream, so lines
/// coming from different services never interleave.
pub(crate) fn write_tagged<W: Write>(
    writer: &mut W,
    name: ServiceName,
    line: &str,
) -> io::Result<()> {
    let tagged = format!("[{name}] {line}\n");
    writer.write_all(tagged.as_bytes())?;
    writer.flush()
}
