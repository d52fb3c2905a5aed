use crate::domain::model::{Antagonism, DoseSeries, ExperimentResult, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Write-only sink for experiment outputs.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// What an experiment run needs to know, independent of where it was configured.
pub trait ExperimentSource: Send + Sync {
    fn experiment_name(&self) -> &str;
    fn simulate(&self) -> bool;
    fn drug_a(&self) -> DoseSeries;
    fn drug_b(&self) -> Option<DoseSeries>;
    fn antagonism(&self) -> Antagonism;
    fn output_formats(&self) -> &[OutputFormat];
    fn bundle_filename(&self) -> Option<&str>;
}

#[async_trait]
pub trait Experiment: Send + Sync {
    async fn prepare(&self) -> Result<Vec<DoseSeries>>;
    async fn simulate(&self, series: Vec<DoseSeries>) -> Result<ExperimentResult>;
    async fn export(&self, result: ExperimentResult) -> Result<Vec<String>>;
}
