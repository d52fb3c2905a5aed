pub mod engine;
pub mod experiment;
pub mod hill;
pub mod interaction;
pub mod table;

pub use crate::domain::model::{DoseSeries, ExperimentResult};
pub use crate::domain::ports::{Experiment, ExperimentSource, Storage};
pub use crate::utils::error::Result;
