//! Machine health, failure probability and status
//!
//! Health uses the same subtract-and-clamp shape as the worker CIS. Failure
//! probability starts from the health deficit and adds fixed amounts for
//! the three signals that predict breakdowns best (vibration, heat, oil).
//! Status is decided from both numbers; maintenance state from health alone.

use crate::{
    constants::{machine::*, SCORE_MAX, SCORE_MIN},
    readings::{MachineReading, MachineStatus, MaintenanceState},
    traits::Scorer,
};

/// Scored machine sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineAssessment {
    /// Operating condition, 0-100, higher is healthier
    pub health_score: u8,
    /// Estimated chance of failure, 0-100
    pub failure_probability: u8,
    /// Operational category
    pub status: MachineStatus,
    /// Days until maintenance is due, at least 1
    pub predicted_maintenance_days: u16,
    /// Descriptive label from `health_score`
    pub maintenance_state: MaintenanceState,
}

/// Threshold scorer for machine telemetry
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineScorer;

impl Scorer for MachineScorer {
    type Reading = MachineReading;
    type Assessment = MachineAssessment;

    fn score(&self, reading: &MachineReading) -> MachineAssessment {
        let health_score = health_score(reading);
        let failure_probability = failure_probability(health_score, reading);
        MachineAssessment {
            health_score,
            failure_probability,
            status: status(health_score, failure_probability),
            predicted_maintenance_days: predicted_maintenance_days(failure_probability),
            maintenance_state: maintenance_state(health_score),
        }
    }
}

/// Health score for one sample
pub fn health_score(reading: &MachineReading) -> u8 {
    let mut score = SCORE_MAX;

    score -= if reading.stress_index > STRESS_SEVERE {
        STRESS_SEVERE_PENALTY
    } else if reading.stress_index > STRESS_HIGH {
        STRESS_HIGH_PENALTY
    } else if reading.stress_index > STRESS_MODERATE {
        STRESS_MODERATE_PENALTY
    } else {
        0
    };

    score -= if reading.temperature > TEMP_OVERHEAT_C {
        TEMP_OVERHEAT_PENALTY
    } else if reading.temperature > TEMP_HOT_C {
        TEMP_HOT_PENALTY
    } else if reading.temperature > TEMP_WARM_C {
        TEMP_WARM_PENALTY
    } else {
        0
    };

    score -= if reading.vibration_rms > VIBRATION_SEVERE_RMS {
        VIBRATION_SEVERE_PENALTY
    } else if reading.vibration_rms > VIBRATION_HIGH_RMS {
        VIBRATION_HIGH_PENALTY
    } else if reading.vibration_rms > VIBRATION_ELEVATED_RMS {
        VIBRATION_ELEVATED_PENALTY
    } else {
        0
    };

    score -= if reading.oil_pressure < OIL_CRITICAL_PSI {
        OIL_CRITICAL_PENALTY
    } else if reading.oil_pressure < OIL_LOW_PSI {
        OIL_LOW_PENALTY
    } else {
        0
    };

    score.clamp(SCORE_MIN, SCORE_MAX) as u8
}

/// Failure probability given the health score and the raw signals
pub fn failure_probability(health_score: u8, reading: &MachineReading) -> u8 {
    let mut probability = SCORE_MAX - health_score as i32;

    if reading.vibration_rms > FAILURE_VIBRATION_RMS {
        probability += FAILURE_VIBRATION_BONUS;
    }
    if reading.temperature > FAILURE_TEMP_C {
        probability += FAILURE_TEMP_BONUS;
    }
    if reading.oil_pressure < FAILURE_OIL_PSI {
        probability += FAILURE_OIL_BONUS;
    }

    probability.clamp(SCORE_MIN, SCORE_MAX) as u8
}

/// Operational status from health and failure probability
pub fn status(health_score: u8, failure_probability: u8) -> MachineStatus {
    if health_score < STATUS_MAINTENANCE_HEALTH_BELOW
        || failure_probability > STATUS_MAINTENANCE_FAILURE_ABOVE
    {
        MachineStatus::Maintenance
    } else if health_score < STATUS_WARNING_HEALTH_BELOW
        || failure_probability > STATUS_WARNING_FAILURE_ABOVE
    {
        MachineStatus::Warning
    } else {
        MachineStatus::Operational
    }
}

/// Days until maintenance: `max(1, (100 - failure) / 3)`
pub fn predicted_maintenance_days(failure_probability: u8) -> u16 {
    let remaining = SCORE_MAX as u16 - failure_probability.min(SCORE_MAX as u8) as u16;
    (remaining / MAINTENANCE_DAYS_DIVISOR as u16).max(1)
}

/// Maintenance label: >=80 normal, >=60 attention, >=40 warning, else critical
pub fn maintenance_state(health_score: u8) -> MaintenanceState {
    if health_score >= MAINTENANCE_NORMAL_MIN_HEALTH {
        MaintenanceState::Normal
    } else if health_score >= MAINTENANCE_ATTENTION_MIN_HEALTH {
        MaintenanceState::Attention
    } else if health_score >= MAINTENANCE_WARNING_MIN_HEALTH {
        MaintenanceState::Warning
    } else {
        MaintenanceState::Critical
    }
}
