use super::command::command_os::CommandOSNotStarted;
use super::command::error::CommandError;
use super::command::executable_data::ExecutableData;
use super::command::exit_code::ProcessExitCode;
use super::command::shutdown::ProcessTerminator;
use super::service_name::ServiceName;
use crate::event::channel::EventPublisher;
use crate::event::SupervisorEvent;
use crate::utils::threads::spawn_named_thread;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Handle to a running service.
pub trait StartedProcess {
    fn pid(&self) -> u32;

    /// Requests the process to stop. It does not wait for the process to exit.
    fn terminate(&self) -> Result<(), CommandError>;
}

/// Starts services and reports their exit.
///
/// Once a process is launched, exactly one [SupervisorEvent::ProcessExited] is published for it.
pub trait ProcessLauncher {
    type Process: StartedProcess;

    fn launch(
        &self,
        executable: &ExecutableData,
        exit_publisher: EventPublisher<SupervisorEvent>,
    ) -> Result<Self::Process, CommandError>;
}

pub struct OSProcessHandle {
    name: ServiceName,
    pid: u32,
}

impl StartedProcess for OSProcessHandle {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn terminate(&self) -> Result<(), CommandError> {
        debug!(service = %self.name, pid = self.pid, "sending termination signal");
        ProcessTerminator::new(self.pid).terminate()
    }
}

/// Launches services as OS processes, relaying their output to the supervisor console.
pub struct OSProcessLauncher {
    services_log_dir: PathBuf,
}

impl OSProcessLauncher {
    pub fn new(services_log_dir: PathBuf) -> Self {
        Self { services_log_dir }
    }
}

impl ProcessLauncher for OSProcessLauncher {
    type Process = OSProcessHandle;

    fn launch(
        &self,
        executable: &ExecutableData,
        exit_publisher: EventPublisher<SupervisorEvent>,
    ) -> Result<Self::Process, CommandError> {
        let name = executable.name;
        let started = CommandOSNotStarted::new(executable, self.services_log_dir.clone())
            .start()?
            .stream()?;
        let pid = started.get_pid();
        info!(service = %name, pid, "service started");

        spawn_named_thread(format!("{name} exit waiter"), move || {
            let code = match started.wait() {
                Ok(status) => ProcessExitCode::from(status),
                Err(err) => {
                    error!(service = %name, "failed waiting for the service to exit: {err}");
                    ProcessExitCode::FAILURE
                }
            };
            debug!(service = %name, %code, "service exited");
            if let Err(err) = exit_publisher.publish(SupervisorEvent::process_exited(name, code)) {
                debug!(service = %name, "exit not delivered: {err}");
            }
        });

        Ok(OSProcessHandle { name, pid })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub StartedProcess {}

        impl StartedProcess for StartedProcess {
            fn pid(&self) -> u32;
            fn terminate(&self) -> Result<(), CommandError>;
        }
    }

    #[cfg(target_family = "unix")]
    mod os {
        use super::super::*;
        use crate::event::channel::pub_sub;
        use std::time::Duration;

        fn shell(name: ServiceName, script: &str) -> ExecutableData {
            ExecutableData::new(name, "sh".to_string())
                .with_args(vec!["-c".to_string(), script.to_string()])
        }

        #[test]
        fn exit_is_published() {
            let (publisher, consumer) = pub_sub();
            let launcher = OSProcessLauncher::new(PathBuf::new());

            let handle = launcher
                .launch(&shell(ServiceName::Api, "exit 4"), publisher)
                .unwrap();
            assert!(handle.pid() > 0);

            let event = consumer
                .as_ref()
                .recv_timeout(Duration::from_secs(5))
                .unwrap();
            assert_eq!(
                event,
                SupervisorEvent::process_exited(ServiceName::Api, ProcessExitCode::from(4))
            );
        }

        #[test]
        fn terminated_process_exit_is_published() {
            let (publisher, consumer) = pub_sub();
            let launcher = OSProcessLauncher::new(PathBuf::new());

            let handle = launcher
                .launch(&shell(ServiceName::Enrichment, "exec sleep 30"), publisher)
                .unwrap();
            std::thread::sleep(Duration::from_millis(200));
            handle.terminate().unwrap();

            let event = consumer
                .as_ref()
                .recv_timeout(Duration::from_secs(5))
                .unwrap();
            assert_eq!(
                event,
                SupervisorEvent::process_exited(
                    ServiceName::Enrichment,
                    ProcessExitCode::from(143)
                )
            );
        }

        #[test]
        fn launch_failure_publishes_nothing() {
            let (publisher, consumer) = pub_sub();
            let launcher = OSProcessLauncher::new(PathBuf::new());

            let result = launcher.launch(
                &ExecutableData::new(ServiceName::Api, "/definitely/not/a/binary".to_string()),
                publisher,
            );

            assert!(result.is_err());
            // the publisher was dropped with the failed launch
            assert!(consumer.as_ref().recv().is_err());
        }

        #[test]
        fn unusable_services_log_dir_fails_launch() {
            let logs_dir = tempfile::tempdir().unwrap();
            let not_a_dir = logs_dir.path().join("not-a-dir");
            std::fs::write(&not_a_dir, "").unwrap();
            let (publisher, consumer) = pub_sub();
            let launcher = OSProcessLauncher::new(not_a_dir);

            let result = launcher.launch(
                &shell(ServiceName::Api, "exit 0").with_log_to_file(true),
                publisher,
            );

            assert!(matches!(result, Err(CommandError::FileLoggerError(_))));
            assert!(consumer.as_ref().recv().is_err());
        }
    }
}
