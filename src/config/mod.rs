#[cfg(feature = "cli")]
pub mod args;
pub mod cli;
pub mod job_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;
