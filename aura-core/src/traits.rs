//! Core traits for validators and scorers
//!
//! Both pipelines (worker vitals, machine telemetry) plug into the same two
//! seams: a boundary `Validator` and a pure `Scorer`.

use crate::errors::TelemetryResult;

/// Boundary check for externally supplied readings
pub trait Validator {
    /// The reading type this validator handles
    type Reading;

    /// Accept the reading or return the first violated bound
    fn validate(&self, reading: &Self::Reading) -> TelemetryResult<()>;
}

/// Pure mapping from a raw reading to its derived assessment
///
/// Implementations must be deterministic and total: the same reading always
/// yields the same assessment and no reading makes them fail.
pub trait Scorer {
    /// The reading type this scorer handles
    type Reading;

    /// Composite index, category and any derived fields
    type Assessment;

    /// Score a reading
    fn score(&self, reading: &Self::Reading) -> Self::Assessment;
}

/// Trait for values that can be checked for numeric sanity
pub trait Finite {
    /// False for NaN and infinities
    fn is_valid(&self) -> bool;
}

impl Finite for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}
