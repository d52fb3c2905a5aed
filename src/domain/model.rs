use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::SimError;

/// Drugs offered by the interaction checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drug {
    Paracetamol,
    Ibuprofen,
    Warfarin,
    Aspirin,
    Ciprofloxacin,
}

impl Drug {
    pub const ALL: [Drug; 5] = [
        Drug::Paracetamol,
        Drug::Ibuprofen,
        Drug::Warfarin,
        Drug::Aspirin,
        Drug::Ciprofloxacin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Drug::Paracetamol => "Paracetamol",
            Drug::Ibuprofen => "Ibuprofen",
            Drug::Warfarin => "Warfarin",
            Drug::Aspirin => "Aspirin",
            Drug::Ciprofloxacin => "Ciprofloxacin",
        }
    }
}

impl fmt::Display for Drug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Drug {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Drug::ALL
            .iter()
            .copied()
            .find(|drug| drug.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Drug::ALL.iter().map(Drug::as_str).collect();
                SimError::validation(format!(
                    "unknown drug '{}', expected one of: {}",
                    wanted,
                    known.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrganStatus {
    #[default]
    Normal,
    Impaired,
}

impl OrganStatus {
    pub fn is_impaired(&self) -> bool {
        matches!(self, OrganStatus::Impaired)
    }
}

impl fmt::Display for OrganStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganStatus::Normal => f.write_str("Normal"),
            OrganStatus::Impaired => f.write_str("Impaired"),
        }
    }
}

impl FromStr for OrganStatus {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(OrganStatus::Normal),
            "impaired" => Ok(OrganStatus::Impaired),
            other => Err(SimError::validation(format!(
                "unknown organ status '{}', expected Normal or Impaired",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub age: u32,
    pub kidney: OrganStatus,
    pub liver: OrganStatus,
}

/// Interaction severity tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }

    /// Effect shown to the student for each tier.
    pub fn effect(&self) -> &'static str {
        match self {
            Severity::Minor => "No significant effect",
            Severity::Moderate => "Reduced clearance",
            Severity::Severe => "Increased toxicity",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scored contribution to an interaction assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskFactor {
    WarfarinInvolved,
    /// Kidney or liver impaired; counted once even when both are.
    OrganImpaired,
    AdvancedAge,
    HighDose,
}

impl RiskFactor {
    pub fn points(&self) -> u32 {
        match self {
            RiskFactor::WarfarinInvolved => 6,
            RiskFactor::OrganImpaired => 3,
            RiskFactor::AdvancedAge => 1,
            RiskFactor::HighDose => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::WarfarinInvolved => "Warfarin in combination",
            RiskFactor::OrganImpaired => "Impaired kidney or liver function",
            RiskFactor::AdvancedAge => "Age 65 or older",
            RiskFactor::HighDose => "Dose above 750 mg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionAssessment {
    pub tier: Severity,
    pub description: String,
    pub points: u32,
    /// Predicted toxicity on a 0..=100 scale.
    pub toxicity_score: u8,
    pub factors: Vec<RiskFactor>,
}

/// Hill-equation constants: `Max * dose^n / (EC50^n + dose^n)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HillParams {
    pub max: f64,
    pub ec50: f64,
    pub n: f64,
}

impl Default for HillParams {
    fn default() -> Self {
        Self {
            max: 20.0,
            ec50: 2.0,
            n: 1.0,
        }
    }
}

pub const DEFAULT_KI: f64 = 2.0;
pub const DEFAULT_FRACTION_BLOCKED: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Antagonism {
    #[default]
    None,
    /// Surmountable block: EC50 is scaled by `1 + [B]/Ki`.
    Competitive { ki: f64 },
    /// Insurmountable block: Max is scaled by `1 - fraction_blocked`.
    NonCompetitive { fraction_blocked: f64 },
}

impl Antagonism {
    pub fn competitive() -> Self {
        Antagonism::Competitive { ki: DEFAULT_KI }
    }

    pub fn non_competitive() -> Self {
        Antagonism::NonCompetitive {
            fraction_blocked: DEFAULT_FRACTION_BLOCKED,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Antagonism::None => "No Interaction",
            Antagonism::Competitive { .. } => "Competitive Antagonist",
            Antagonism::NonCompetitive { .. } => "Non-competitive Antagonist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseResponseRow {
    pub dose: f64,
    pub log_dose: f64,
    pub response: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_with_antagonist: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseResponseTable {
    pub drug: String,
    pub rows: Vec<DoseResponseRow>,
}

impl DoseResponseTable {
    pub fn responses(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.response).collect()
    }

    pub fn has_antagonist_column(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.response_with_antagonist.is_some())
    }
}

/// Doses and (optionally) observed responses for one drug, as entered by the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseSeries {
    pub drug: String,
    pub doses: Vec<f64>,
    pub observed_responses: Option<Vec<f64>>,
    pub params: HillParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

/// Output of the simulate stage, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub experiment: String,
    pub simulated: bool,
    pub interaction: Option<String>,
    pub tables: Vec<DoseResponseTable>,
    pub interpretation: Vec<String>,
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drug_parsing_is_case_insensitive() {
        assert_eq!("warfarin".parse::<Drug>().unwrap(), Drug::Warfarin);
        assert_eq!(" ASPIRIN ".parse::<Drug>().unwrap(), Drug::Aspirin);
        assert!("Atropine".parse::<Drug>().is_err());
    }

    #[test]
    fn test_organ_status_parsing() {
        assert_eq!("Impaired".parse::<OrganStatus>().unwrap(), OrganStatus::Impaired);
        assert_eq!("normal".parse::<OrganStatus>().unwrap(), OrganStatus::Normal);
        assert!("failing".parse::<OrganStatus>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Severe);
        assert_eq!(Severity::Severe.effect(), "Increased toxicity");
    }

    #[test]
    fn test_antagonism_serde_shape() {
        let parsed: Antagonism =
            serde_json::from_str(r#"{"kind":"competitive","ki":2.0}"#).unwrap();
        assert_eq!(parsed, Antagonism::competitive());

        let json = serde_json::to_value(Antagonism::non_competitive()).unwrap();
        assert_eq!(json["kind"], "non_competitive");
        assert_eq!(json["fraction_blocked"], 0.4);
    }
}
