//! Hill-equation dose–response evaluation.
//!
//! `E(d) = Max · d^n / (EC50^n + d^n)`
//!
//! evaluated as `Max / (1 + (EC50/d)^n)`, which is the same curve but is
//! exactly `Max/2` at `d == EC50`, is monotone in `d`, and gives 0 at `d == 0`
//! without a special case.

use crate::domain::model::{Antagonism, HillParams};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{validate_doses, validate_positive, validate_range, validate_same_length};

/// Added to doses before taking a logarithm so that a zero dose stays finite.
pub const LOG_DOSE_EPSILON: f64 = 1e-6;

pub fn validate_params(params: &HillParams) -> Result<()> {
    validate_positive("hill.max", params.max)?;
    validate_positive("hill.ec50", params.ec50)?;
    validate_positive("hill.n", params.n)?;
    Ok(())
}

pub fn validate_antagonism(antagonism: &Antagonism) -> Result<()> {
    match antagonism {
        Antagonism::None => Ok(()),
        Antagonism::Competitive { ki } => validate_positive("interaction.ki", *ki),
        Antagonism::NonCompetitive { fraction_blocked } => {
            validate_range("interaction.fraction_blocked", *fraction_blocked, 0.0, 1.0)
        }
    }
}

#[inline]
fn response_at(dose: f64, max: f64, ec50: f64, n: f64) -> f64 {
    max / (1.0 + (ec50 / dose).powf(n))
}

/// EC50 seen by the agonist in the presence of a competitive antagonist at `antagonist_dose`.
pub fn effective_ec50(ec50: f64, antagonist_dose: f64, ki: f64) -> f64 {
    ec50 * (1.0 + antagonist_dose / ki)
}

/// Evaluate the Hill curve at each dose.
///
/// For [`Antagonism::Competitive`] the antagonist doses are paired elementwise
/// with `doses` and must have the same length. The other modes ignore them.
pub fn hill_response(
    doses: &[f64],
    params: &HillParams,
    antagonism: &Antagonism,
    antagonist_doses: &[f64],
) -> Result<Vec<f64>> {
    validate_params(params)?;
    validate_antagonism(antagonism)?;
    validate_doses("doses", doses)?;

    let HillParams { max, ec50, n } = *params;

    let responses = match *antagonism {
        Antagonism::None => doses.iter().map(|&d| response_at(d, max, ec50, n)).collect(),
        Antagonism::Competitive { ki } => {
            validate_doses("antagonist_doses", antagonist_doses)?;
            validate_same_length("antagonist_doses", doses.len(), antagonist_doses.len())?;
            doses
                .iter()
                .zip(antagonist_doses)
                .map(|(&d, &b)| response_at(d, max, effective_ec50(ec50, b, ki), n))
                .collect()
        }
        Antagonism::NonCompetitive { fraction_blocked } => {
            let reduced_max = max * (1.0 - fraction_blocked);
            doses
                .iter()
                .map(|&d| response_at(d, reduced_max, ec50, n))
                .collect()
        }
    };

    Ok(responses)
}

/// Single-curve convenience wrapper with no antagonist.
pub fn simulate_response(doses: &[f64], params: &HillParams) -> Result<Vec<f64>> {
    hill_response(doses, params, &Antagonism::None, &[])
}

pub fn log_dose(dose: f64) -> f64 {
    (dose + LOG_DOSE_EPSILON).log10()
}

/// `count` evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, count: usize) -> Result<Vec<f64>> {
    if !start.is_finite() || !stop.is_finite() {
        return Err(SimError::validation("linspace bounds must be finite"));
    }

    Ok(match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = stop;
            values
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max: f64, ec50: f64, n: f64) -> HillParams {
        HillParams { max, ec50, n }
    }

    #[test]
    fn test_default_ileum_curve_at_ec50() {
        let result = simulate_response(&[2.0], &params(20.0, 2.0, 1.0)).unwrap();
        assert_eq!(result, vec![10.0]);
    }

    #[test]
    fn test_half_max_at_ec50_is_exact() {
        for &(max, ec50, n) in &[
            (20.0, 2.0, 1.0),
            (15.0, 0.3, 2.5),
            (100.0, 200.0, 1.0),
            (7.3, 13.7, 0.4),
            (1.0e-3, 1.0e3, 4.0),
        ] {
            let result = simulate_response(&[ec50], &params(max, ec50, n)).unwrap();
            assert_eq!(result[0], max / 2.0, "max={} ec50={} n={}", max, ec50, n);
        }
    }

    #[test]
    fn test_monotone_in_dose() {
        let doses = linspace(0.0, 50.0, 501).unwrap();
        for &n in &[0.25, 0.5, 1.0, 2.0, 3.7] {
            let responses = simulate_response(&doses, &params(20.0, 2.0, n)).unwrap();
            for pair in responses.windows(2) {
                assert!(pair[1] >= pair[0], "n={} {:?}", n, pair);
            }
        }
    }

    #[test]
    fn test_zero_dose_gives_zero_response() {
        let result = simulate_response(&[0.0], &HillParams::default()).unwrap();
        assert_eq!(result, vec![0.0]);
    }

    #[test]
    fn test_response_approaches_max() {
        let result = simulate_response(&[1.0e9], &HillParams::default()).unwrap();
        assert!((result[0] - 20.0).abs() < 1e-6);
        assert!(result[0] <= 20.0);
    }

    #[test]
    fn test_competitive_shifts_ec50_right() {
        let p = HillParams::default();
        let doses = [0.5, 1.0, 2.0, 4.0, 8.0];
        let antagonist = [2.0; 5];

        let alone = simulate_response(&doses, &p).unwrap();
        let blocked = hill_response(&doses, &p, &Antagonism::competitive(), &antagonist).unwrap();

        for (a, b) in alone.iter().zip(&blocked) {
            assert!(b < a);
        }

        // Half-max now sits at the shifted EC50.
        let shifted = effective_ec50(p.ec50, 2.0, 2.0);
        assert_eq!(shifted, 4.0);
        let at_shifted =
            hill_response(&[shifted], &p, &Antagonism::competitive(), &[2.0]).unwrap();
        assert_eq!(at_shifted[0], p.max / 2.0);

        // Asymptote is preserved.
        let high = hill_response(&[1.0e9], &p, &Antagonism::competitive(), &[2.0]).unwrap();
        assert!((high[0] - p.max).abs() < 1e-6);
    }

    #[test]
    fn test_competitive_with_zero_antagonist_matches_agonist_alone() {
        let p = HillParams::default();
        let doses = [0.0, 1.0, 2.0, 3.0];
        let alone = simulate_response(&doses, &p).unwrap();
        let blocked =
            hill_response(&doses, &p, &Antagonism::competitive(), &[0.0; 4]).unwrap();
        assert_eq!(alone, blocked);
    }

    #[test]
    fn test_competitive_requires_paired_antagonist_doses() {
        let err = hill_response(
            &[1.0, 2.0],
            &HillParams::default(),
            &Antagonism::competitive(),
            &[1.0],
        )
        .unwrap_err();
        assert!(matches!(err, SimError::ValidationError { .. }));
    }

    #[test]
    fn test_non_competitive_scales_max_and_keeps_ec50() {
        let p = HillParams::default();
        let antagonism = Antagonism::non_competitive();

        let at_ec50 = hill_response(&[p.ec50], &p, &antagonism, &[]).unwrap();
        assert_eq!(at_ec50[0], p.max * (1.0 - 0.4) / 2.0);

        let doses = [0.5, 1.0, 4.0, 16.0];
        let alone = simulate_response(&doses, &p).unwrap();
        let blocked = hill_response(&doses, &p, &antagonism, &[]).unwrap();
        for (a, b) in alone.iter().zip(&blocked) {
            assert!((b / a - 0.6).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let p = HillParams::default();
        assert!(simulate_response(&[-1.0], &p).is_err());
        assert!(simulate_response(&[f64::NAN], &p).is_err());
        assert!(simulate_response(&[1.0], &params(0.0, 2.0, 1.0)).is_err());
        assert!(simulate_response(&[1.0], &params(20.0, -2.0, 1.0)).is_err());
        assert!(simulate_response(&[1.0], &params(20.0, 2.0, 0.0)).is_err());
        assert!(hill_response(&[1.0], &p, &Antagonism::Competitive { ki: 0.0 }, &[1.0]).is_err());
        assert!(hill_response(
            &[1.0],
            &p,
            &Antagonism::NonCompetitive { fraction_blocked: 1.5 },
            &[]
        )
        .is_err());
        assert!(hill_response(&[1.0], &p, &Antagonism::competitive(), &[-3.0]).is_err());
    }

    #[test]
    fn test_log_dose_guards_zero() {
        assert!((log_dose(0.0) + 6.0).abs() < 1e-9);
        assert!((log_dose(10.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_linspace() {
        let grid = linspace(0.0, 1000.0, 50).unwrap();
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[49], 1000.0);
        assert!(linspace(0.0, 1.0, 0).unwrap().is_empty());
        assert_eq!(linspace(3.0, 9.0, 1).unwrap(), vec![3.0]);
        assert!(linspace(0.0, f64::INFINITY, 3).is_err());
    }
}
