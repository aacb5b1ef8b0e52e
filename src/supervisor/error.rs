use crate::process::command::error::CommandError;
use crate::process::service_name::ServiceName;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("could not launch {0}: `{1}`")]
    Launch(ServiceName, CommandError),
}
