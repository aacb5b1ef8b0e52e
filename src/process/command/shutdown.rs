use super::error::CommandError;

/// ProcessTerminator requests the termination of the process with the pid provided.
///
/// Only the graceful request is sent. There is no grace period and no forced kill afterwards,
/// the process is expected to exit on its own.
pub struct ProcessTerminator {
    pid: u32,
}

impl ProcessTerminator {
    pub fn new(pid: u32) -> Self {
        Self { pid }
    }

    #[cfg(target_family = "unix")]
    /// Sends a SIGTERM to the process.
    pub fn terminate(self) -> Result<(), CommandError> {
        use nix::{sys::signal, unistd::Pid};

        let pid = i32::try_from(self.pid)
            .map_err(|_| CommandError::NixError(format!("invalid pid {}", self.pid)))?;
        signal::kill(Pid::from_raw(pid), signal::SIGTERM)
            .map_err(|err| CommandError::NixError(err.to_string()))
    }

    #[cfg(not(target_family = "unix"))]
    pub fn terminate(self) -> Result<(), CommandError> {
        Err(CommandError::Unsupported(format!(
            "process {} can't be terminated gracefully on this platform",
            self.pid
        )))
    }
}
