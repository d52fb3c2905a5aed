use crate::core::hill::{validate_antagonism, validate_params};
use crate::core::ExperimentSource;
use crate::domain::model::{
    Antagonism, DoseSeries, HillParams, OutputFormat, DEFAULT_FRACTION_BLOCKED, DEFAULT_KI,
};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{
    validate_doses, validate_non_empty_string, validate_path, validate_required_field,
    validate_same_length, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Max response of the second drug when it is not configured.
pub const DEFAULT_DRUG_B_MAX: f64 = 15.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub experiment: ExperimentSection,
    pub drug_a: DrugSection,
    pub drug_b: Option<DrugSection>,
    pub interaction: Option<InteractionSection>,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentMode {
    Single,
    TwoDrug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSection {
    pub name: String,
    pub description: Option<String>,
    pub mode: ExperimentMode,
    /// Auto-generate responses from the Hill model instead of using observed values.
    pub simulate: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugSection {
    pub name: String,
    pub doses: Vec<f64>,
    pub observed_responses: Option<Vec<f64>>,
    pub max: Option<f64>,
    pub ec50: Option<f64>,
    pub n: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Competitive,
    NonCompetitive,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSection {
    pub kind: InteractionKind,
    pub ki: Option<f64>,
    pub fraction_blocked: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
    pub formats: Vec<OutputFormat>,
    pub bundle: Option<BundleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub enabled: bool,
    pub filename: String,
}

impl DrugSection {
    pub fn to_series(&self, default_max: f64) -> DoseSeries {
        let defaults = HillParams::default();
        DoseSeries {
            drug: self.name.clone(),
            doses: self.doses.clone(),
            observed_responses: self.observed_responses.clone(),
            params: HillParams {
                max: self.max.unwrap_or(default_max),
                ec50: self.ec50.unwrap_or(defaults.ec50),
                n: self.n.unwrap_or(defaults.n),
            },
        }
    }

    fn validate_section(&self, section: &str, simulate: bool, default_max: f64) -> Result<()> {
        validate_non_empty_string(&format!("{}.name", section), &self.name)?;
        if self.doses.is_empty() {
            return Err(SimError::InvalidConfigValueError {
                field: format!("{}.doses", section),
                value: "[]".to_string(),
                reason: "At least one dose is required".to_string(),
            });
        }
        validate_doses(&format!("{}.doses", section), &self.doses)?;
        validate_params(&self.to_series(default_max).params)?;

        if !simulate {
            let field = format!("{}.observed_responses", section);
            let observed = validate_required_field(&field, &self.observed_responses)?;
            validate_same_length(&field, self.doses.len(), observed.len())?;
            validate_doses(&field, observed)?;
        }
        Ok(())
    }
}

impl ExperimentConfig {
    /// Load an experiment from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SimError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SimError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SimError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn is_two_drug(&self) -> bool {
        self.experiment.mode == ExperimentMode::TwoDrug
    }

    pub fn simulation_enabled(&self) -> bool {
        self.experiment.simulate.unwrap_or(true)
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("experiment.name", &self.experiment.name)?;

        let simulate = self.simulation_enabled();
        self.drug_a
            .validate_section("drug_a", simulate, HillParams::default().max)?;

        if self.is_two_drug() {
            let drug_b = validate_required_field("drug_b", &self.drug_b)?;
            drug_b.validate_section("drug_b", simulate, DEFAULT_DRUG_B_MAX)?;

            if simulate && matches!(self.antagonism(), Antagonism::Competitive { .. }) {
                validate_same_length("drug_b.doses", self.drug_a.doses.len(), drug_b.doses.len())?;
            }
        }
        validate_antagonism(&self.antagonism())?;

        validate_path("output.path", &self.output.path)?;
        if self.output.path.contains("${") {
            return Err(SimError::InvalidConfigValueError {
                field: "output.path".to_string(),
                value: self.output.path.clone(),
                reason: "Environment variable is not set".to_string(),
            });
        }
        if self.output.formats.is_empty() {
            return Err(SimError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: "[]".to_string(),
                reason: "Choose at least one of: csv, tsv, json".to_string(),
            });
        }
        if let Some(bundle) = self.output.bundle.as_ref().filter(|b| b.enabled) {
            validate_path("output.bundle.filename", &bundle.filename)?;
        }

        Ok(())
    }
}

impl ExperimentSource for ExperimentConfig {
    fn experiment_name(&self) -> &str {
        &self.experiment.name
    }

    fn simulate(&self) -> bool {
        self.simulation_enabled()
    }

    fn drug_a(&self) -> DoseSeries {
        self.drug_a.to_series(HillParams::default().max)
    }

    fn drug_b(&self) -> Option<DoseSeries> {
        if !self.is_two_drug() {
            return None;
        }
        self.drug_b
            .as_ref()
            .map(|section| section.to_series(DEFAULT_DRUG_B_MAX))
    }

    /// Two-drug runs default to competitive antagonism with Ki = 2 and 40% block.
    fn antagonism(&self) -> Antagonism {
        if !self.is_two_drug() {
            return Antagonism::None;
        }
        match &self.interaction {
            None => Antagonism::competitive(),
            Some(section) => match section.kind {
                InteractionKind::None => Antagonism::None,
                InteractionKind::Competitive => Antagonism::Competitive {
                    ki: section.ki.unwrap_or(DEFAULT_KI),
                },
                InteractionKind::NonCompetitive => Antagonism::NonCompetitive {
                    fraction_blocked: section.fraction_blocked.unwrap_or(DEFAULT_FRACTION_BLOCKED),
                },
            },
        }
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output.formats
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.output
            .bundle
            .as_ref()
            .filter(|bundle| bundle.enabled)
            .map(|bundle| bundle.filename.as_str())
    }
}

impl Validate for ExperimentConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
