//! # Numeric Guards
//!
//! Shared checks used on the way into and out of the engine. Inputs that
//! fail a check become [`CalcError::InvalidDimension`]; derived figures that
//! fail become [`CalcError::CalculationOverflow`]. Nothing is clamped.

use crate::errors::{CalcError, CalcResult};

/// Require a finite value strictly greater than zero.
pub fn require_positive(subject: &str, field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_dimension(
            subject,
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    if value <= 0.0 {
        return Err(CalcError::invalid_dimension(
            subject,
            field,
            value.to_string(),
            "Value must be greater than zero",
        ));
    }
    Ok(value)
}

/// Require a finite value greater than or equal to zero.
pub fn require_non_negative(subject: &str, field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_dimension(
            subject,
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_dimension(
            subject,
            field,
            value.to_string(),
            "Value cannot be negative",
        ));
    }
    Ok(value)
}

/// Check a derived figure before it leaves the engine.
///
/// Failures here mean an upstream invariant was broken, so they are logged
/// at error level, apart from ordinary validation failures.
pub fn ensure_finite_non_negative(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        log::error!("derived value '{field}' is invalid: {value}");
        Err(CalcError::calculation_overflow(field, value))
    }
}
