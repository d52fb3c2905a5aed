pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::hill::hill_response;
pub use crate::core::interaction::score;
pub use crate::core::{engine::LabEngine, experiment::IleumExperiment};
pub use config::{cli::LocalStorage, toml_config::ExperimentConfig};
pub use domain::model::{Antagonism, Drug, HillParams, InteractionAssessment, OrganStatus, Severity};
pub use utils::error::{Result, SimError};
