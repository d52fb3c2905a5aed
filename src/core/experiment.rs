use crate::core::hill::{hill_response, simulate_response};
use crate::core::table::{build_table, render_delimited};
use crate::core::{DoseSeries, Experiment, ExperimentResult, ExperimentSource, Storage};
use crate::domain::model::{Antagonism, DoseResponseTable, OutputFormat};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{validate_doses, validate_same_length};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const SUMMARY_FILENAME: &str = "summary.json";

/// Organ-bath dose–response experiment with one agonist and an optional second drug.
pub struct IleumExperiment<S: Storage, C: ExperimentSource> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ExperimentSource> IleumExperiment<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn responses_for(&self, series: &DoseSeries) -> Result<Vec<f64>> {
        if self.config.simulate() {
            simulate_response(&series.doses, &series.params)
        } else {
            series.observed_responses.clone().ok_or_else(|| {
                SimError::validation(format!(
                    "observed responses for {} are required when simulation is off",
                    series.drug
                ))
            })
        }
    }
}

fn table_stems(count: usize) -> &'static [&'static str] {
    if count == 1 {
        &["dose_response"]
    } else {
        &["drug_a", "drug_b"]
    }
}

pub fn interpret(result_tables: &[DoseResponseTable], antagonism: &Antagonism) -> Vec<String> {
    match result_tables {
        [single] => vec![
            format!("The response increases with increasing dose of {}", single.drug),
            "Demonstrates a graded dose-response relationship".to_string(),
            "Curve can be used to study potency or compare with other drugs".to_string(),
        ],
        [a, b, ..] => vec![
            format!(
                "The curves show how {} responds alone and in presence of {}.",
                a.drug, b.drug
            ),
            format!("{} interaction is demonstrated.", antagonism.label()),
            "This virtual lab allows study of drug potency, graded responses, and drug interactions without real tissue.".to_string(),
        ],
        [] => Vec::new(),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ExperimentSource> Experiment for IleumExperiment<S, C> {
    async fn prepare(&self) -> Result<Vec<DoseSeries>> {
        let mut series = vec![self.config.drug_a()];
        series.extend(self.config.drug_b());

        for entry in &series {
            validate_doses(&format!("{}.doses", entry.drug), &entry.doses)?;
            if !self.config.simulate() {
                let observed = entry.observed_responses.as_deref().ok_or_else(|| {
                    SimError::MissingConfigError {
                        field: format!("{}.observed_responses", entry.drug),
                    }
                })?;
                validate_same_length(
                    &format!("{}.observed_responses", entry.drug),
                    entry.doses.len(),
                    observed.len(),
                )?;
                validate_doses(&format!("{}.observed_responses", entry.drug), observed)?;
            }
            tracing::debug!("Prepared {} with {} doses", entry.drug, entry.doses.len());
        }

        Ok(series)
    }

    async fn simulate(&self, series: Vec<DoseSeries>) -> Result<ExperimentResult> {
        let antagonism = self.config.antagonism();
        let simulated = self.config.simulate();

        let tables = match series.as_slice() {
            [drug_a] => {
                let responses = self.responses_for(drug_a)?;
                vec![build_table(&drug_a.drug, &drug_a.doses, &responses, None)?]
            }
            [drug_a, drug_b] => {
                let responses_a = self.responses_for(drug_a)?;
                let responses_b = self.responses_for(drug_b)?;

                // Observed data carries no automatic interaction.
                let with_b = if simulated {
                    hill_response(&drug_a.doses, &drug_a.params, &antagonism, &drug_b.doses)?
                } else {
                    responses_a.clone()
                };

                vec![
                    build_table(&drug_a.drug, &drug_a.doses, &responses_a, Some(&with_b))?,
                    build_table(&drug_b.drug, &drug_b.doses, &responses_b, None)?,
                ]
            }
            other => {
                return Err(SimError::processing(format!(
                    "an experiment takes one or two drugs, got {}",
                    other.len()
                )))
            }
        };

        let interaction = (tables.len() > 1).then(|| antagonism.label().to_string());
        let interpretation = interpret(&tables, &antagonism);
        for line in &interpretation {
            tracing::info!("🧠 {}", line);
        }

        Ok(ExperimentResult {
            experiment: self.config.experiment_name().to_string(),
            simulated,
            interaction,
            tables,
            interpretation,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    async fn export(&self, result: ExperimentResult) -> Result<Vec<String>> {
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        let stems = table_stems(result.tables.len());

        for format in self.config.output_formats() {
            match format {
                OutputFormat::Csv | OutputFormat::Tsv => {
                    let delimiter = if *format == OutputFormat::Csv { b',' } else { b'\t' };
                    for (table, stem) in result.tables.iter().zip(stems) {
                        let body = render_delimited(table, delimiter)?;
                        files.push((format!("{}.{}", stem, format.extension()), body.into_bytes()));
                    }
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&result)?;
                    files.push((SUMMARY_FILENAME.to_string(), json.into_bytes()));
                }
            }
        }

        if let Some(bundle) = self.config.bundle_filename() {
            tracing::debug!("Creating ZIP bundle with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
            self.storage.write_file(bundle, &zip_data).await?;
            return Ok(vec![bundle.to_string()]);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in files {
            self.storage.write_file(&name, &data).await?;
            tracing::debug!("Wrote {} ({} bytes)", name, data.len());
            written.push(name);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::HillParams;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockSource {
        simulate: bool,
        drug_a: DoseSeries,
        drug_b: Option<DoseSeries>,
        antagonism: Antagonism,
        formats: Vec<OutputFormat>,
        bundle: Option<String>,
    }

    fn series(drug: &str, doses: &[f64], max: f64) -> DoseSeries {
        DoseSeries {
            drug: drug.to_string(),
            doses: doses.to_vec(),
            observed_responses: None,
            params: HillParams {
                max,
                ..HillParams::default()
            },
        }
    }

    impl MockSource {
        fn single() -> Self {
            Self {
                simulate: true,
                drug_a: series("Acetylcholine", &[0.5, 1.0, 2.0, 4.0, 8.0], 20.0),
                drug_b: None,
                antagonism: Antagonism::None,
                formats: vec![OutputFormat::Csv],
                bundle: None,
            }
        }

        fn two_drug(antagonism: Antagonism) -> Self {
            Self {
                drug_b: Some(series("Atropine", &[2.0; 5], 15.0)),
                antagonism,
                ..Self::single()
            }
        }
    }

    impl ExperimentSource for MockSource {
        fn experiment_name(&self) -> &str {
            "mock"
        }

        fn simulate(&self) -> bool {
            self.simulate
        }

        fn drug_a(&self) -> DoseSeries {
            self.drug_a.clone()
        }

        fn drug_b(&self) -> Option<DoseSeries> {
            self.drug_b.clone()
        }

        fn antagonism(&self) -> Antagonism {
            self.antagonism
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.formats
        }

        fn bundle_filename(&self) -> Option<&str> {
            self.bundle.as_deref()
        }
    }

    #[tokio::test]
    async fn test_single_drug_simulation() {
        let experiment = IleumExperiment::new(MockStorage::new(), MockSource::single());

        let series = experiment.prepare().await.unwrap();
        let result = experiment.simulate(series).await.unwrap();

        assert_eq!(result.tables.len(), 1);
        assert!(result.interaction.is_none());
        let responses = result.tables[0].responses();
        assert_eq!(responses[2], 10.0);
        assert!(responses.windows(2).all(|w| w[1] >= w[0]));
        assert!(result.interpretation[0].contains("Acetylcholine"));
    }

    #[tokio::test]
    async fn test_two_drug_competitive() {
        let experiment = IleumExperiment::new(
            MockStorage::new(),
            MockSource::two_drug(Antagonism::competitive()),
        );

        let series = experiment.prepare().await.unwrap();
        let result = experiment.simulate(series).await.unwrap();

        assert_eq!(result.tables.len(), 2);
        assert_eq!(result.interaction.as_deref(), Some("Competitive Antagonist"));

        let drug_a = &result.tables[0];
        for row in &drug_a.rows {
            assert!(row.response_with_antagonist.unwrap() < row.response);
        }
        // EC50 shifts from 2 to 4 with [B] = 2 and Ki = 2.
        assert_eq!(drug_a.rows[3].dose, 4.0);
        assert_eq!(drug_a.rows[3].response_with_antagonist, Some(10.0));

        // Drug B alone uses its own Max of 15.
        assert_eq!(result.tables[1].rows[0].response, 7.5);
    }

    #[tokio::test]
    async fn test_two_drug_non_competitive() {
        let experiment = IleumExperiment::new(
            MockStorage::new(),
            MockSource::two_drug(Antagonism::non_competitive()),
        );

        let series = experiment.prepare().await.unwrap();
        let result = experiment.simulate(series).await.unwrap();

        let at_ec50 = &result.tables[0].rows[2];
        assert_eq!(at_ec50.response, 10.0);
        assert_eq!(at_ec50.response_with_antagonist, Some(20.0 * (1.0 - 0.4) / 2.0));
    }

    #[tokio::test]
    async fn test_manual_entry_requires_observed_responses() {
        let mut source = MockSource::single();
        source.simulate = false;
        let experiment = IleumExperiment::new(MockStorage::new(), source);

        let err = experiment.prepare().await.unwrap_err();
        assert!(matches!(err, SimError::MissingConfigError { .. }));
    }

    #[tokio::test]
    async fn test_manual_entry_uses_observed_values() {
        let mut source = MockSource::two_drug(Antagonism::competitive());
        source.simulate = false;
        source.drug_a.observed_responses = Some(vec![1.0, 2.0, 4.0, 7.0, 9.0]);
        if let Some(b) = source.drug_b.as_mut() {
            b.observed_responses = Some(vec![0.5; 5]);
        }
        let experiment = IleumExperiment::new(MockStorage::new(), source);

        let series = experiment.prepare().await.unwrap();
        let result = experiment.simulate(series).await.unwrap();

        assert!(!result.simulated);
        let drug_a = &result.tables[0];
        assert_eq!(drug_a.responses(), vec![1.0, 2.0, 4.0, 7.0, 9.0]);
        for row in &drug_a.rows {
            assert_eq!(row.response_with_antagonist, Some(row.response));
        }
    }

    #[tokio::test]
    async fn test_prepare_rejects_negative_doses() {
        let mut source = MockSource::single();
        source.drug_a.doses = vec![1.0, -2.0];
        let experiment = IleumExperiment::new(MockStorage::new(), source);

        assert!(matches!(
            experiment.prepare().await,
            Err(SimError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_export_writes_each_format() {
        let storage = MockStorage::new();
        let mut source = MockSource::two_drug(Antagonism::competitive());
        source.formats = vec![OutputFormat::Csv, OutputFormat::Tsv, OutputFormat::Json];
        let experiment = IleumExperiment::new(storage.clone(), source);

        let series = experiment.prepare().await.unwrap();
        let result = experiment.simulate(series).await.unwrap();
        let written = experiment.export(result).await.unwrap();

        assert_eq!(
            written,
            vec!["drug_a.csv", "drug_b.csv", "drug_a.tsv", "drug_b.tsv", "summary.json"]
        );

        let csv = String::from_utf8(storage.get_file("drug_a.csv").await.unwrap()).unwrap();
        assert!(csv.starts_with("dose,log_dose,response,response_with_antagonist"));

        let summary: serde_json::Value =
            serde_json::from_slice(&storage.get_file("summary.json").await.unwrap()).unwrap();
        assert_eq!(summary["experiment"], "mock");
        assert_eq!(summary["tables"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_export_bundle() {
        let storage = MockStorage::new();
        let mut source = MockSource::single();
        source.formats = vec![OutputFormat::Csv, OutputFormat::Json];
        source.bundle = Some("ileum_output.zip".to_string());
        let experiment = IleumExperiment::new(storage.clone(), source);

        let series = experiment.prepare().await.unwrap();
        let result = experiment.simulate(series).await.unwrap();
        let written = experiment.export(result).await.unwrap();
        assert_eq!(written, vec!["ileum_output.zip"]);

        let zip_bytes = storage.get_file("ileum_output.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["dose_response.csv", "summary.json"]);
    }
}
