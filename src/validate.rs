//! Input validation helpers.
//!
//! Standardizes validation across the crate using `!is_finite()` to reject
//! NaN, +Inf, and -Inf uniformly.

use crate::error::WellpathError;

/// Validate that a value is non-negative and finite (rejects NaN, Inf, negatives).
pub(crate) fn validate_non_negative(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(WellpathError::validation(format!(
            "{name} must be non-negative and finite, got {value}"
        )));
    }
    Ok(value)
}

/// Validate that a value is finite (rejects NaN and Inf; allows zero and negatives).
pub(crate) fn validate_finite(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() {
        return Err(WellpathError::validation(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(value)
}

/// Validate an inclination in degrees: finite and within `[0, 180]`.
pub(crate) fn validate_inclination(value: f64) -> crate::error::Result<f64> {
    if !value.is_finite() || !(0.0..=180.0).contains(&value) {
        return Err(WellpathError::validation(format!(
            "inclination must be within [0, 180] degrees, got {value}"
        )));
    }
    Ok(value)
}
