use chrono::NaiveDate;
use thiserror::Error;

/// Rejections raised when a record violates its data-model invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteAmount { field: &'static str },
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("budget for {category} overlaps existing budget {existing}")]
    OverlappingBudget { category: String, existing: String },
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteAmount { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveAmount { field, value });
    }
    Ok(())
}
