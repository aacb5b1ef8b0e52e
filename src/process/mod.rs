pub mod command;
pub mod launcher;
pub mod service_name;
