pub mod broadcaster;
pub mod channel;

use crate::process::command::exit_code::ProcessExitCode;
use crate::process::service_name::ServiceName;

#[derive(Clone, Debug, PartialEq)]
pub enum ApplicationEvent {
    StopRequested,
}

/// Events produced by the managed processes and consumed by the supervisor state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SupervisorEvent {
    ProcessExited {
        name: ServiceName,
        code: ProcessExitCode,
    },
}

impl SupervisorEvent {
    pub fn process_exited(name: ServiceName, code: ProcessExitCode) -> Self {
        Self::ProcessExited { name, code }
    }
}
