//! Entry point of the backend supervisor.
//!
//! Parses the command line arguments and either performs a one-shot action or supervises the
//! `enrichment` and `api` services until they stop.
use backend_supervisor::cli::{Cli, CliCommand, SupervisorCliConfig};
use backend_supervisor::event::channel::{pub_sub, EventPublisher};
use backend_supervisor::event::ApplicationEvent;
use backend_supervisor::process::command::exit_code::ProcessExitCode;
use backend_supervisor::process::launcher::OSProcessLauncher;
use backend_supervisor::supervisor::supervisor::Supervisor;
use std::error::Error;
use std::process::ExitCode;
use tracing::{error, info, trace};

fn main() -> ExitCode {
    let cli_command = match Cli::init() {
        Ok(cli_command) => cli_command,
        Err(err) => {
            // Logging might not be initialized yet
            eprintln!("Error initializing the backend supervisor: {err}");
            return ExitCode::FAILURE;
        }
    };

    let cli_config = match cli_command {
        CliCommand::InitSupervisor(cli_config) => cli_config,
        CliCommand::Quit(operation) => {
            operation.run_one_shot();
            return ExitCode::SUCCESS;
        }
    };

    match _main(cli_config) {
        Ok(code) => code.into(),
        Err(err) => {
            error!("The backend supervisor failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// This is the actual main function.
///
/// It is separated from [main] so errors are logged once, in string format, before the program
/// exits with a failure code.
fn _main(cli_config: SupervisorCliConfig) -> Result<ProcessExitCode, Box<dyn Error>> {
    // Flushes the supervisor log file when dropped, keep it until the end
    let _file_logger_guard = cli_config.file_logger_guard;
    let config = cli_config.config;

    let (application_event_publisher, application_event_consumer) = pub_sub();

    trace!("creating the signal handler");
    create_shutdown_signal_handler(application_event_publisher)?;

    let launcher = OSProcessLauncher::new(config.services_log_dir.clone());
    let code = Supervisor::new(&config, launcher).run(&application_event_consumer)?;

    info!(%code, "backend supervisor exiting");
    Ok(code)
}

/// Turns SIGINT and SIGTERM into an [ApplicationEvent::StopRequested] for the supervisor.
pub fn create_shutdown_signal_handler(
    publisher: EventPublisher<ApplicationEvent>,
) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        info!("Received termination signal. Stopping the backend supervisor");
        let _ = publisher
            .publish(ApplicationEvent::StopRequested)
            .inspect_err(|e| error!("Could not send the stop request: {}", e));
    })
    .inspect_err(|e| error!("Could not set signal handler: {e}"))
}
