use super::error::SupervisorError;
use super::managed_process::ManagedProcess;
use super::state::SupervisorState;
use crate::config::SupervisorConfig;
use crate::event::channel::{pub_sub, EventConsumer, EventPublisher};
use crate::event::{ApplicationEvent, SupervisorEvent};
use crate::process::command::executable_data::ExecutableData;
use crate::process::command::exit_code::ProcessExitCode;
use crate::process::launcher::ProcessLauncher;
use crate::process::service_name::ServiceName;
use crossbeam::channel::{after, never, Receiver};
use crossbeam::select;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Starts `enrichment`, then `api` once the start delay elapsed without `enrichment` exiting,
/// and derives the exit code of the whole program from how the services end.
///
/// Services are never restarted. On termination only `enrichment` is asked to stop, once.
pub struct Supervisor<L>
where
    L: ProcessLauncher,
{
    launcher: L,
    api_start_delay: Duration,
    enrichment: ManagedProcess<L::Process>,
    api: ManagedProcess<L::Process>,
    state: SupervisorState,
    exit_publisher: EventPublisher<SupervisorEvent>,
    exit_consumer: EventConsumer<SupervisorEvent>,
}

impl<L> Supervisor<L>
where
    L: ProcessLauncher,
{
    pub fn new(config: &SupervisorConfig, launcher: L) -> Self {
        let (exit_publisher, exit_consumer) = pub_sub();
        Self {
            launcher,
            api_start_delay: config.api_start_delay,
            enrichment: ManagedProcess::new(ExecutableData::from_config(
                ServiceName::Enrichment,
                &config.enrichment,
                config,
            )),
            api: ManagedProcess::new(ExecutableData::from_config(
                ServiceName::Api,
                &config.api,
                config,
            )),
            state: SupervisorState::Idle,
            exit_publisher,
            exit_consumer,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Drives the services until the supervisor is terminated and returns its exit code.
    ///
    /// A failure launching any service is returned as an error, after `enrichment` was asked to
    /// stop when it is running.
    pub fn run(
        &mut self,
        application_events: &EventConsumer<ApplicationEvent>,
    ) -> Result<ProcessExitCode, SupervisorError> {
        self.transition(SupervisorState::StartingEnrichment);
        if let Err(err) = self
            .enrichment
            .launch(&self.launcher, self.exit_publisher.clone())
        {
            error!(service = %ServiceName::Enrichment, "launch failed: {err}");
            self.transition(SupervisorState::Terminated(ProcessExitCode::FAILURE));
            return Err(SupervisorError::Launch(ServiceName::Enrichment, err));
        }
        self.transition(SupervisorState::WaitingForApiDelay);

        let launch_error = self.supervise(application_events);

        let code = match self.state {
            SupervisorState::Terminating(code) => code,
            _ => ProcessExitCode::FAILURE,
        };
        if self.enrichment.request_termination() {
            info!(service = %ServiceName::Enrichment, "termination requested");
        }
        self.transition(SupervisorState::Terminated(code));

        match launch_error {
            Some(err) => Err(err),
            None => Ok(code),
        }
    }

    /// Event loop. Returns once the supervisor is terminating, with the `api` launch error if
    /// that is the cause.
    fn supervise(
        &mut self,
        application_events: &EventConsumer<ApplicationEvent>,
    ) -> Option<SupervisorError> {
        let exit_events = self.exit_consumer.as_ref().clone();
        let api_timer = after(self.api_start_delay);
        let never_fires = never();
        let never_stops = never();
        let mut stop_channel_open = true;

        while !self.state.is_terminating() {
            let timer = if self.state == SupervisorState::WaitingForApiDelay {
                &api_timer
            } else {
                &never_fires
            };
            let stop_requests = if stop_channel_open {
                application_events.as_ref()
            } else {
                &never_stops
            };

            select! {
                recv(exit_events) -> event => {
                    // The supervisor keeps a publisher, the channel is never disconnected
                    if let Ok(SupervisorEvent::ProcessExited { name, code }) = event {
                        self.handle_exit(name, code);
                    }
                },
                recv(timer) -> _ => {
                    // An exit that raced with the timer wins, `api` is not started after it
                    self.drain_exit_events(&exit_events);
                    if self.state == SupervisorState::WaitingForApiDelay {
                        if let Err(err) = self.start_api() {
                            return Some(err);
                        }
                    }
                },
                recv(stop_requests) -> event => match event {
                    Ok(ApplicationEvent::StopRequested) => {
                        info!("stop requested");
                        self.transition(SupervisorState::Terminating(ProcessExitCode::SUCCESS));
                    }
                    Err(_) => {
                        debug!("application events channel closed");
                        stop_channel_open = false;
                    }
                },
            }
        }
        None
    }

    fn drain_exit_events(&mut self, exit_events: &Receiver<SupervisorEvent>) {
        while !self.state.is_terminating() {
            let Ok(SupervisorEvent::ProcessExited { name, code }) = exit_events.try_recv() else {
                break;
            };
            self.handle_exit(name, code);
        }
    }

    fn start_api(&mut self) -> Result<(), SupervisorError> {
        self.transition(SupervisorState::StartingApi);
        match self.api.launch(&self.launcher, self.exit_publisher.clone()) {
            Ok(()) => {
                self.transition(SupervisorState::Running);
                Ok(())
            }
            Err(err) => {
                error!(service = %ServiceName::Api, "launch failed: {err}");
                self.transition(SupervisorState::Terminating(ProcessExitCode::FAILURE));
                Err(SupervisorError::Launch(ServiceName::Api, err))
            }
        }
    }

    fn handle_exit(&mut self, name: ServiceName, code: ProcessExitCode) {
        match name {
            ServiceName::Enrichment => {
                self.enrichment.mark_exited(code);
                if self.state == SupervisorState::WaitingForApiDelay {
                    warn!(service = %name, %code, "exited before api was started");
                    self.transition(SupervisorState::Degraded);
                    // A clean early exit leaves the supervisor degraded until a stop request
                    if code.is_success() {
                        return;
                    }
                } else {
                    warn!(service = %name, %code, "exited");
                }
                let final_code = if code.is_success() {
                    ProcessExitCode::SUCCESS
                } else {
                    ProcessExitCode::FAILURE
                };
                self.transition(SupervisorState::Terminating(final_code));
            }
            ServiceName::Api => {
                self.api.mark_exited(code);
                info!(service = %name, %code, "exited");
                self.transition(SupervisorState::Terminating(code));
            }
        }
    }

    fn transition(&mut self, state: SupervisorState) {
        debug!(from = %self.state, to = %state, "supervisor state changed");
        self.state = state;
    }
}
