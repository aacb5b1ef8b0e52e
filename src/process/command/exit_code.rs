use std::fmt::Display;
use std::process::{ExitCode, ExitStatus};

/// Shells report a process killed by signal `N` as exit code `128 + N`.
#[cfg(target_family = "unix")]
const SIGNAL_EXIT_CODE_BASE: i32 = 128;

/// Numeric exit code of a process: a managed service or the supervisor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExitCode(i32);

impl ProcessExitCode {
    pub const SUCCESS: Self = Self(0);
    /// Generic failure used when there is no child exit code to propagate.
    pub const FAILURE: Self = Self(1);

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Exit codes out of `0..=255` can't be reported by a process as they are.
    pub fn portable_code(&self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }
}

impl From<i32> for ProcessExitCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl From<ExitStatus> for ProcessExitCode {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self(code);
        }

        #[cfg(target_family = "unix")]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self(SIGNAL_EXIT_CODE_BASE + signal);
            }
        }

        Self::FAILURE
    }
}

impl From<ProcessExitCode> for ExitCode {
    fn from(code: ProcessExitCode) -> Self {
        code.portable_code()
            .map(ExitCode::from)
            .unwrap_or(ExitCode::FAILURE)
    }
}

impl Display for ProcessExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
