//! Constants for Aura Core
//!
//! Every threshold, penalty and bound used by the scorers and validators lives
//! here so that scoring rules can be audited in one place.
//!
//! ## Organization
//!
//! - **Worker**: payload bounds and CIS penalty bands for worker vitals
//! - **Machine**: payload bounds, health penalty bands and status cut-offs
//!
//! Names carry their unit where the value has one (`_BPM`, `_C`, `_MS`).

/// Worker vitals bounds and CIS scoring bands.
pub mod worker;

/// Machine telemetry bounds and health scoring bands.
pub mod machine;

/// Upper bound of every composite score.
pub const SCORE_MAX: i32 = 100;

/// Lower bound of every composite score.
pub const SCORE_MIN: i32 = 0;

pub use worker::{
    HEART_RATE_MIN_BPM, HEART_RATE_MAX_BPM, HRV_MIN_MS, HRV_MAX_MS,
    BODY_TEMP_MIN_C, BODY_TEMP_MAX_C, RISK_HIGH_MAX_SCORE, RISK_MEDIUM_MAX_SCORE,
};

pub use machine::{
    MACHINE_TEMP_MIN_C, MACHINE_TEMP_MAX_C, STATUS_MAINTENANCE_HEALTH_BELOW,
    STATUS_WARNING_HEALTH_BELOW,
};
