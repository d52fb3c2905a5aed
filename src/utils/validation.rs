use crate::utils::error::{Result, SimError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Curve constants (Max, EC50, n, Ki) must be finite and strictly positive.
pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number greater than 0".to_string(),
        });
    }
    Ok(())
}

pub fn validate_doses(field_name: &str, doses: &[f64]) -> Result<()> {
    for (index, dose) in doses.iter().enumerate() {
        if !dose.is_finite() || *dose < 0.0 {
            return Err(SimError::validation(format!(
                "{}[{}] = {} is not a non-negative number",
                field_name, index, dose
            )));
        }
    }
    Ok(())
}

pub fn validate_same_length(field_name: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(SimError::validation(format!(
            "{} has {} values but {} were expected",
            field_name, actual, expected
        )));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SimError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written so that NaN falls through to the error branch
    if !(value >= min && value <= max) {
        return Err(SimError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("hill.ec50", 2.0).is_ok());
        assert!(validate_positive("hill.ec50", 0.0).is_err());
        assert!(validate_positive("hill.ec50", -1.0).is_err());
        assert!(validate_positive("hill.ec50", f64::NAN).is_err());
        assert!(validate_positive("hill.ec50", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_doses() {
        assert!(validate_doses("doses", &[0.0, 0.5, 10.0]).is_ok());
        assert!(validate_doses("doses", &[]).is_ok());

        let err = validate_doses("doses", &[1.0, -0.1]).unwrap_err();
        assert!(err.to_string().contains("doses[1]"));
        assert!(validate_doses("doses", &[f64::NAN]).is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("age", 30, 1, 90).is_ok());
        assert!(validate_range("age", 0, 1, 90).is_err());
        assert!(validate_range("dose", f64::NAN, 50.0, 1000.0).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<i32> = None;
        assert_eq!(*validate_required_field("drug_b", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("drug_b", &missing),
            Err(SimError::MissingConfigError { .. })
        ));
    }
}
