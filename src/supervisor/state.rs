use crate::process::command::exit_code::ProcessExitCode;
use std::fmt::Display;

/// Lifecycle of the supervisor.
///
/// `Idle → StartingEnrichment → WaitingForApiDelay → StartingApi → Running → Terminating →
/// Terminated`. `Degraded` is entered when `enrichment` exits before `api` was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    StartingEnrichment,
    WaitingForApiDelay,
    StartingApi,
    Running,
    Degraded,
    /// Remaining services are being asked to stop. Holds the exit code of the supervisor.
    Terminating(ProcessExitCode),
    Terminated(ProcessExitCode),
}

impl SupervisorState {
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Terminating(_))
    }
}

impl Display for SupervisorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::StartingEnrichment => write!(f, "starting enrichment"),
            Self::WaitingForApiDelay => write!(f, "waiting for api start delay"),
            Self::StartingApi => write!(f, "starting api"),
            Self::Running => write!(f, "running"),
            Self::Degraded => write!(f, "degraded"),
            Self::Terminating(code) => write!(f, "terminating with exit code {code}"),
            Self::Terminated(code) => write!(f, "terminated with exit code {code}"),
        }
    }
}
