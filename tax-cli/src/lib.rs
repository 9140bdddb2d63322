//! Arguments, configuration, logging and output for the `taxhunt` binary.

pub mod app;
pub mod args;
pub mod config;
pub mod logging;
pub mod output;

pub use app::{run, run_to_stdout};
pub use args::Cli;
pub use config::AppConfig;
