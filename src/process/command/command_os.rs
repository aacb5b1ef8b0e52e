use crate::defaults::{STDERR_LOG_PREFIX, STDOUT_LOG_PREFIX};
use crate::process::command::executable_data::ExecutableData;
use crate::process::service_name::ServiceName;
use crate::utils::threads::spawn_named_thread;
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError};
use std::{
    path::PathBuf,
    process::{Child, Command, ExitStatus, Stdio},
    time::Duration,
};
use tracing::debug;

use super::{
    error::CommandError,
    logging::{
        self,
        file_logger::{file_logger, FileSystemLoggers},
        logger::{ConsoleStream, Logger},
    },
};

/// Max time to wait, once the process exited, for its remaining output to be relayed.
const RELAY_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

////////////////////////////////////////////////////////////////////////////////////
// States for Started/Not Started Command
////////////////////////////////////////////////////////////////////////////////////
pub struct CommandOSNotStarted {
    cmd: Command,
    name: ServiceName,
    logs_to_file: bool,
    logging_path: PathBuf,
}

pub struct CommandOSStarted {
    name: ServiceName,
    process: Child,
    loggers: Option<FileSystemLoggers>,
    /// Disconnected once every relay thread of this process finished.
    relay_drained: Option<Receiver<()>>,
}

////////////////////////////////////////////////////////////////////////////////////
// Not Started Command OS
////////////////////////////////////////////////////////////////////////////////////
impl CommandOSNotStarted {
    pub fn new(executable_data: &ExecutableData, logging_path: PathBuf) -> Self {
        let mut cmd = Command::new(&executable_data.bin);
        cmd.args(&executable_data.args)
            .envs(&executable_data.env)
            .current_dir(&executable_data.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        Self {
            cmd,
            name: executable_data.name,
            logs_to_file: executable_data.log_to_file,
            logging_path,
        }
    }

    pub fn start(mut self) -> Result<CommandOSStarted, CommandError> {
        let name = self.name;
        // Log files are created before spawning, a failure leaves nothing running
        let loggers = if self.logs_to_file {
            Some(FileSystemLoggers::new(
                file_logger(name, self.logging_path.clone(), STDOUT_LOG_PREFIX)?,
                file_logger(name, self.logging_path, STDERR_LOG_PREFIX)?,
            ))
        } else {
            None
        };
        let child = self.cmd.spawn()?;

        Ok(CommandOSStarted {
            name,
            process: child,
            loggers,
            relay_drained: None,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////
// Started Command OS
////////////////////////////////////////////////////////////////////////////////////
impl CommandOSStarted {
    pub fn get_pid(&self) -> u32 {
        self.process.id()
    }

    /// Blocks until the process exits and its output was relayed. A descendant process keeping
    /// the pipes open delays the return by [RELAY_DRAIN_TIMEOUT] at most.
    pub(crate) fn wait(mut self) -> Result<ExitStatus, CommandError> {
        let status = self.process.wait()?;
        if let Some(relay_drained) = self.relay_drained.take() {
            if let Err(RecvTimeoutError::Timeout) = relay_drained.recv_timeout(RELAY_DRAIN_TIMEOUT)
            {
                debug!(service = %self.name, "output still open after the process exited");
            }
        }
        Ok(status)
    }

    /// Starts relaying stdout and stderr, each line tagged with the service name.
    ///
    /// If an output is not piped the process is killed and reaped before returning the error.
    pub(crate) fn stream(mut self) -> Result<Self, CommandError> {
        let (stdout, stderr) = match (self.process.stdout.take(), self.process.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            (stdout, _) => {
                let missing = if stdout.is_none() { "stdout" } else { "stderr" };
                self.kill_and_reap();
                return Err(CommandError::StreamPipeError(missing.to_string()));
            }
        };

        let mut stdout_loggers = vec![Logger::Console(ConsoleStream::Stdout, self.name)];
        let mut stderr_loggers = vec![Logger::Console(ConsoleStream::Stderr, self.name)];

        if let Some(l) = self.loggers.take() {
            let (out, err) = l.into_loggers();
            stdout_loggers.push(Logger::File(out));
            stderr_loggers.push(Logger::File(err));
        };

        let mut relay_threads = logging::thread::spawn_logger(stdout, stdout_loggers);
        relay_threads.extend(logging::thread::spawn_logger(stderr, stderr_loggers));

        let (drained, relay_drained) = bounded::<()>(0);
        spawn_named_thread(format!("{} output relay watcher", self.name), move || {
            relay_threads.into_iter().for_each(|thread| {
                let _ = thread.join();
            });
            drop(drained);
        });
        self.relay_drained = Some(relay_drained);

        Ok(self)
    }

    fn kill_and_reap(&mut self) {
        if let Err(err) = self.process.kill() {
            debug!(service = %self.name, "could not kill process: {err}");
        }
        if let Err(err) = self.process.wait() {
            debug!(service = %self.name, "could not reap process: {err}");
        }
    }
}
