//! jobsift command-line runner: configuration, Chromium page controller and
//! report output around the `jobsift` pipeline.

pub mod browser;
pub mod config;
pub mod runner;
pub mod sink;

pub use config::{resolve_config_path, AppConfig};
pub use runner::{run, RunSummary};
pub use sink::FileSink;
