//! Input validation in front of the metrics engine
//!
//! The formulas themselves are total and never fail; these checks let callers
//! reject out-of-domain input before it turns into NaN or nonsense.

use thiserror::Error;

/// Domain errors for engine inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("reps must be at least 1, got {0}")]
    InvalidReps(u32),

    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Require a finite, strictly positive value
pub fn validate_positive(field: &'static str, value: f64) -> Result<f64, MetricsError> {
    if !value.is_finite() {
        return Err(MetricsError::NonFinite { field, value });
    }
    if value <= 0.0 {
        return Err(MetricsError::NotPositive { field, value });
    }
    Ok(value)
}

/// Require a finite value that is zero or more
pub fn validate_non_negative(field: &'static str, value: f64) -> Result<f64, MetricsError> {
    if !value.is_finite() {
        return Err(MetricsError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(MetricsError::Negative { field, value });
    }
    Ok(value)
}

/// The Epley estimate is only defined from one rep upward
pub fn validate_reps(reps: u32) -> Result<u32, MetricsError> {
    if reps < 1 {
        return Err(MetricsError::InvalidReps(reps));
    }
    Ok(reps)
}

/// Parse a closed enum from user text, naming the enum in the error
pub fn parse_variant<T>(
    kind: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, MetricsError> {
    parse(value).ok_or_else(|| MetricsError::UnknownVariant {
        kind,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Goal;

    #[test]
    fn test_validate_positive() {
        assert_eq!(validate_positive("weight_kg", 70.0), Ok(70.0));
        assert!(matches!(
            validate_positive("weight_kg", 0.0),
            Err(MetricsError::NotPositive { field: "weight_kg", .. })
        ));
        assert!(matches!(
            validate_positive("weight_kg", f64::INFINITY),
            Err(MetricsError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_validate_non_negative() {
        assert_eq!(validate_non_negative("fat", 0.0), Ok(0.0));
        assert!(validate_non_negative("fat", -0.1).is_err());
        assert!(validate_non_negative("fat", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_reps() {
        assert_eq!(validate_reps(1), Ok(1));
        assert_eq!(validate_reps(0), Err(MetricsError::InvalidReps(0)));
    }

    #[test]
    fn test_parse_variant_error_message() {
        let err = parse_variant("goal", "shred", Goal::from_str).unwrap_err();
        assert_eq!(err.to_string(), "unknown goal: 'shred'");
        assert_eq!(parse_variant("goal", "fat_loss", Goal::from_str), Ok(Goal::FatLoss));
    }
}
