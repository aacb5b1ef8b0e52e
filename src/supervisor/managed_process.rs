use crate::event::channel::EventPublisher;
use crate::event::SupervisorEvent;
use crate::process::command::error::CommandError;
use crate::process::command::executable_data::ExecutableData;
use crate::process::command::exit_code::ProcessExitCode;
use crate::process::launcher::{ProcessLauncher, StartedProcess};
use crate::process::service_name::ServiceName;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotStarted,
    Running,
    Exited(ProcessExitCode),
}

/// A service owned by the supervisor. It is launched at most once.
pub struct ManagedProcess<P> {
    executable: ExecutableData,
    handle: Option<P>,
    state: ProcessState,
    termination_requested: bool,
}

impl<P> ManagedProcess<P>
where
    P: StartedProcess,
{
    pub fn new(executable: ExecutableData) -> Self {
        Self {
            executable,
            handle: None,
            state: ProcessState::NotStarted,
            termination_requested: false,
        }
    }

    pub fn name(&self) -> ServiceName {
        self.executable.name
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }

    pub fn launch<L>(
        &mut self,
        launcher: &L,
        exit_publisher: EventPublisher<SupervisorEvent>,
    ) -> Result<(), CommandError>
    where
        L: ProcessLauncher<Process = P>,
    {
        if self.state != ProcessState::NotStarted {
            return Err(CommandError::AlreadyStarted(self.name()));
        }
        info!(
            service = %self.name(),
            working_dir = %self.executable.working_dir.display(),
            "launching {} {}",
            self.executable.bin,
            self.executable.args.join(" ")
        );
        let handle = launcher.launch(&self.executable, exit_publisher)?;
        self.handle = Some(handle);
        self.state = ProcessState::Running;
        Ok(())
    }

    /// Records the exit of the process. The handle is released, so no signal can reach a
    /// recycled pid afterwards.
    pub fn mark_exited(&mut self, code: ProcessExitCode) {
        self.handle = None;
        self.state = ProcessState::Exited(code);
    }

    /// Sends a termination request if the process is running and was not asked to stop before.
    /// Returns whether a request was issued.
    pub fn request_termination(&mut self) -> bool {
        if self.termination_requested || !self.is_running() {
            return false;
        }
        let Some(handle) = self.handle.as_ref() else {
            return false;
        };
        self.termination_requested = true;

        debug!(service = %self.name(), pid = handle.pid(), "requesting termination");
        if let Err(err) = handle.terminate() {
            warn!(service = %self.name(), "termination request failed: {err}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::channel::pub_sub;
    use crate::process::launcher::tests::MockStartedProcess;
    use assert_matches::assert_matches;
    use mockall::mock;
    use tracing_test::traced_test;

    mock! {
        pub Launcher {}

        impl ProcessLauncher for Launcher {
            type Process = MockStartedProcess;

            fn launch(
                &self,
                executable: &ExecutableData,
                exit_publisher: EventPublisher<SupervisorEvent>,
            ) -> Result<MockStartedProcess, CommandError>;
        }
    }

    fn enrichment() -> ExecutableData {
        ExecutableData::new(ServiceName::Enrichment, "python3".to_string())
    }

    fn running_process(terminations: usize) -> ManagedProcess<MockStartedProcess> {
        let mut started = MockStartedProcess::new();
        started.expect_pid().return_const(42u32);
        started
            .expect_terminate()
            .times(terminations)
            .returning(|| Ok(()));

        let mut launcher = MockLauncher::new();
        launcher.expect_launch().once().return_once(|_, _| Ok(started));

        let mut process = ManagedProcess::new(enrichment());
        let (publisher, _consumer) = pub_sub();
        process.launch(&launcher, publisher).unwrap();
        process
    }

    #[test]
    fn launch_once() {
        let mut process = running_process(0);
        assert_eq!(process.state(), ProcessState::Running);

        let launcher = MockLauncher::new();
        let (publisher, _consumer) = pub_sub();
        assert_matches!(
            process.launch(&launcher, publisher),
            Err(CommandError::AlreadyStarted(ServiceName::Enrichment))
        );
    }

    #[test]
    fn launch_failure_keeps_process_not_started() {
        let mut launcher = MockLauncher::new();
        launcher.expect_launch().once().returning(|_, _| {
            Err(CommandError::IOError(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            )))
        });

        let mut process: ManagedProcess<MockStartedProcess> = ManagedProcess::new(enrichment());
        let (publisher, _consumer) = pub_sub();

        assert_matches!(
            process.launch(&launcher, publisher),
            Err(CommandError::IOError(_))
        );
        assert_eq!(process.state(), ProcessState::NotStarted);
        assert!(!process.request_termination());
    }

    #[test]
    fn termination_requested_once() {
        let mut process = running_process(1);

        assert!(process.request_termination());
        assert!(!process.request_termination());
        assert!(!process.request_termination());
    }

    #[test]
    fn no_termination_after_exit() {
        let mut process = running_process(0);

        process.mark_exited(ProcessExitCode::from(3));

        assert_eq!(process.state(), ProcessState::Exited(ProcessExitCode::from(3)));
        assert!(!process.is_running());
        assert!(!process.request_termination());
    }

    #[traced_test]
    #[test]
    fn failed_termination_request_is_not_retried() {
        let mut started = MockStartedProcess::new();
        started.expect_pid().return_const(42u32);
        started
            .expect_terminate()
            .once()
            .returning(|| Err(CommandError::NixError("ESRCH".to_string())));
        let mut launcher = MockLauncher::new();
        launcher.expect_launch().once().return_once(|_, _| Ok(started));

        let mut process = ManagedProcess::new(enrichment());
        let (publisher, _consumer) = pub_sub();
        process.launch(&launcher, publisher).unwrap();

        assert!(process.request_termination());
        assert!(!process.request_termination());
        assert!(logs_contain("termination request failed"));
    }
}
