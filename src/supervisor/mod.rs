pub mod error;
pub mod managed_process;
pub mod state;
#[allow(clippy::module_inception)]
pub mod supervisor;
