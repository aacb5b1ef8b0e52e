use crate::config::SupervisorConfig;
use crate::utils::binary_metadata::binary_metadata;

use super::Cli;

#[derive(Debug)]
pub enum OneShotOperation {
    PrintVersion,
    PrintDebugInfo(Cli, Box<SupervisorConfig>),
}

impl OneShotOperation {
    /// Runs the one-shot operation
    pub fn run_one_shot(&self) {
        match self {
            OneShotOperation::PrintVersion => {
                println!("{}", binary_metadata());
            }
            OneShotOperation::PrintDebugInfo(cli, config) => {
                println!("Printing debug info");
                println!("CLI: {:#?}", cli);
                println!("Config: {:#?}", config);
            }
        }
    }
}
