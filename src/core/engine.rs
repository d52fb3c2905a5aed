use crate::core::Experiment;
use crate::utils::error::Result;
use std::time::Instant;

pub struct LabEngine<E: Experiment> {
    experiment: E,
}

impl<E: Experiment> LabEngine<E> {
    pub fn new(experiment: E) -> Self {
        Self { experiment }
    }

    /// Run prepare, simulate and export in order; returns the written output names.
    pub async fn run(&self) -> Result<Vec<String>> {
        let started = Instant::now();
        tracing::info!("Starting experiment...");

        tracing::info!("Preparing dose series...");
        let series = self.experiment.prepare().await?;
        tracing::info!("Prepared {} dose series", series.len());

        tracing::info!("Simulating responses...");
        let result = self.experiment.simulate(series).await?;
        tracing::info!(
            "Computed {} table(s) for '{}'",
            result.tables.len(),
            result.experiment
        );

        tracing::info!("Exporting results...");
        let outputs = self.experiment.export(result).await?;
        tracing::info!(
            "Exported {} file(s) in {:?}",
            outputs.len(),
            started.elapsed()
        );

        Ok(outputs)
    }
}
