//! Core scoring engine for Aura
//!
//! Turns raw site telemetry into the numbers a safety dashboard shows:
//! a Composite Index Score and risk state for each worker, a health score,
//! failure probability and status for each machine.
//!
//! Everything here is a pure function of its input. Validators guard the
//! boundary, scorers never fail, and the per-type machine profiles are
//! static tables.
//!
//! ```rust
//! use aura_core::{MachineReading, MachineScorer, MachineStatus, Scorer};
//!
//! let reading = MachineReading {
//!     stress_index: 85,
//!     temperature: 95.0,
//!     vibration_rms: 3.5,
//!     oil_pressure: 15,
//!     ..Default::default()
//! };
//! let assessment = MachineScorer.score(&reading);
//! assert_eq!(assessment.health_score, 0);
//! assert_eq!(assessment.status, MachineStatus::Maintenance);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod constants;
pub mod errors;
pub mod profile;
pub mod readings;
pub mod records;
pub mod scoring;
pub mod time;
pub mod traits;
pub mod validators;

// Public API
pub use errors::{EntityKind, TelemetryError, TelemetryResult};
pub use profile::{MachineProfile, MetricRange};
pub use readings::{
    MachineReading, MachineStatus, MachineType, MaintenanceState, RiskState, TargetState,
    WorkerReading,
};
pub use records::{MachineTelemetryEntry, WorkerVitalsEntry};
pub use scoring::{MachineAssessment, MachineScorer, WorkerAssessment, WorkerScorer};
pub use time::{FixedTime, TimeSource, Timestamp};
pub use traits::{Scorer, Validator};
pub use validators::{MachineValidator, WorkerValidator};

#[cfg(feature = "std")]
pub use time::SystemTime;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate an externally supplied worker reading, then score it
pub fn score_worker_payload(reading: &WorkerReading) -> TelemetryResult<WorkerAssessment> {
    WorkerValidator::default().validate(reading)?;
    let assessment = WorkerScorer.score(reading);
    log_debug!("worker payload scored: cis={} risk={}", assessment.cis_score, assessment.risk_state);
    Ok(assessment)
}

/// Validate an externally supplied machine reading, then score it
pub fn score_machine_payload(reading: &MachineReading) -> TelemetryResult<MachineAssessment> {
    MachineValidator::default().validate(reading)?;
    let assessment = MachineScorer.score(reading);
    log_debug!(
        "machine payload scored: health={} failure={} status={}",
        assessment.health_score,
        assessment.failure_probability,
        assessment.status
    );
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn invalid_payload_never_reaches_scorer() {
        let reading = WorkerReading { hrv: 201, ..Default::default() };
        assert!(score_worker_payload(&reading).unwrap_err().is_validation());
    }

    #[test]
    fn valid_payload_is_scored() {
        let reading = MachineReading { temperature: 62.5, ..Default::default() };
        let assessment = score_machine_payload(&reading).unwrap();
        assert_eq!(assessment.health_score, 95);
    }
}
