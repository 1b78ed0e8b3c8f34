//! Shared range checks used by every payload validator

use crate::{
    errors::{TelemetryError, TelemetryResult},
    traits::Finite,
};

/// Check a float field: finite and within `[min, max]`
pub fn check_float(field: &'static str, value: f64, min: f64, max: f64) -> TelemetryResult<()> {
    if !value.is_valid() {
        return Err(TelemetryError::InvalidValue { field });
    }
    check_range(field, value, min, max)
}

/// Check a float field that only has a lower bound
pub fn check_non_negative(field: &'static str, value: f64) -> TelemetryResult<()> {
    check_float(field, value, 0.0, f64::MAX)
}

/// Check an integer field
pub fn check_int<T: Into<f64> + Copy>(field: &'static str, value: T, min: T, max: T) -> TelemetryResult<()> {
    check_range(field, value.into(), min.into(), max.into())
}

/// Check if a value is within the specified range
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> TelemetryResult<()> {
    if value < min || value > max {
        Err(TelemetryError::OutOfRange { field, value, min, max })
    } else {
        Ok(())
    }
}
