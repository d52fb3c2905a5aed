//! Drug–drug interaction scoring for the teaching simulator.
//!
//! Each risk factor adds a fixed number of points (see [`RiskFactor::points`]);
//! the total is bucketed into a [`Severity`] tier and mapped onto a 0..=100
//! toxicity reading. Selecting the same drug twice is not an interaction and
//! always scores zero.

use crate::domain::model::{Drug, InteractionAssessment, OrganStatus, Patient, RiskFactor, Severity};
use crate::utils::error::Result;
use crate::utils::validation::validate_range;

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 90;
pub const MIN_DOSE_MG: f64 = 50.0;
pub const MAX_DOSE_MG: f64 = 1000.0;

pub const ADVANCED_AGE: u32 = 65;
pub const HIGH_DOSE_MG: f64 = 750.0;

const BASE_TOXICITY: u32 = 20;
const TOXICITY_PER_POINT: u32 = 10;

pub fn severity_for_points(points: u32) -> Severity {
    match points {
        0..=2 => Severity::Minor,
        3..=5 => Severity::Moderate,
        _ => Severity::Severe,
    }
}

pub fn toxicity_for_points(points: u32) -> u8 {
    let score = BASE_TOXICITY.saturating_add(points.saturating_mul(TOXICITY_PER_POINT));
    score.min(100) as u8
}

pub fn risk_factors(drug_a: Drug, drug_b: Drug, patient: &Patient, dose_mg: f64) -> Vec<RiskFactor> {
    if drug_a == drug_b {
        return Vec::new();
    }

    let mut factors = Vec::new();
    if drug_a == Drug::Warfarin || drug_b == Drug::Warfarin {
        factors.push(RiskFactor::WarfarinInvolved);
    }
    if patient.kidney.is_impaired() || patient.liver.is_impaired() {
        factors.push(RiskFactor::OrganImpaired);
    }
    if patient.age >= ADVANCED_AGE {
        factors.push(RiskFactor::AdvancedAge);
    }
    if dose_mg > HIGH_DOSE_MG {
        factors.push(RiskFactor::HighDose);
    }
    factors
}

/// Score an interaction between `drug_a` (given at `dose_mg`) and `drug_b`.
///
/// Age must lie in `1..=90` years and the dose in `50..=1000` mg.
pub fn score(
    drug_a: Drug,
    drug_b: Drug,
    kidney: OrganStatus,
    liver: OrganStatus,
    age: u32,
    dose_mg: f64,
) -> Result<InteractionAssessment> {
    score_patient(drug_a, drug_b, &Patient { age, kidney, liver }, dose_mg)
}

pub fn score_patient(
    drug_a: Drug,
    drug_b: Drug,
    patient: &Patient,
    dose_mg: f64,
) -> Result<InteractionAssessment> {
    validate_range("patient.age", patient.age, MIN_AGE, MAX_AGE)?;
    validate_range("dose_mg", dose_mg, MIN_DOSE_MG, MAX_DOSE_MG)?;

    let factors = risk_factors(drug_a, drug_b, patient, dose_mg);
    let points: u32 = factors.iter().map(RiskFactor::points).sum();
    let tier = severity_for_points(points);

    tracing::debug!(
        "{} + {}: {} point(s) from {:?} -> {}",
        drug_a,
        drug_b,
        points,
        factors,
        tier
    );

    Ok(InteractionAssessment {
        tier,
        description: tier.effect().to_string(),
        points,
        toxicity_score: toxicity_for_points(points),
        factors,
    })
}
