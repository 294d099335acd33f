mod config;
mod data;
pub mod error;

pub use config::{Config, OutputFormat, Settings, TableSettings};
pub use data::CmdExit;
