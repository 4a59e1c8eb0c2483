pub mod config;
pub mod core;
pub mod domain;
pub mod regression;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{
    engine::{ExperimentEngine, ExperimentOutcome},
    pipeline::RegressionPipeline,
};
pub use utils::error::{RegressionError, Result};
