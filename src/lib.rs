pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, job_config::JobConfig};

pub use crate::app::pipelines::{batch_pipeline::BatchPipeline, single_pipeline::SinglePipeline};
pub use crate::core::{destructor::Destructor, engine::DestructorEngine};
pub use crate::domain::records::{CRecord, ParameterGroup, Unit};
pub use crate::utils::error::{DestructorError, Result};
