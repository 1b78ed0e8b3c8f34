//! Worker Composite Index Score (CIS)
//!
//! Start from a perfect 100 and subtract a fixed penalty for each metric
//! that breaches a band. Bands within a metric are mutually exclusive and
//! evaluated from the most severe down, so a heart rate of 130 costs 30
//! points, not 45.
//!
//! ```text
//! heart_rate   >120: -30   >100: -15   <50: -20
//! hrv           <20: -30    <35: -15
//! temperature  >38.5: -30  >37.5: -15  <35.5: -20
//! machine_si    >70: -20    >50: -10
//! jerk_count   -min(2 * jerks, 15)
//! ```
//!
//! Risk state: `cis <= 30` HIGH, `cis <= 70` MEDIUM, otherwise LOW.

use crate::{
    constants::{worker::*, SCORE_MAX, SCORE_MIN},
    readings::{RiskState, WorkerReading},
    traits::Scorer,
};

/// Scored worker sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerAssessment {
    /// Composite Index Score, 0-100, higher is safer
    pub cis_score: u8,
    /// Category derived from `cis_score`
    pub risk_state: RiskState,
}

impl WorkerAssessment {
    /// Fatigue estimate derived from the CIS, 0-100
    pub fn fatigue_level(&self) -> f64 {
        fatigue_level(self.cis_score)
    }
}

/// Threshold scorer for worker vitals
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerScorer;

impl Scorer for WorkerScorer {
    type Reading = WorkerReading;
    type Assessment = WorkerAssessment;

    fn score(&self, reading: &WorkerReading) -> WorkerAssessment {
        let cis_score = cis_score(reading);
        WorkerAssessment {
            cis_score,
            risk_state: risk_state(cis_score),
        }
    }
}

/// Composite Index Score for one sample
pub fn cis_score(reading: &WorkerReading) -> u8 {
    let mut score = SCORE_MAX;

    score -= heart_rate_penalty(reading.heart_rate);
    score -= hrv_penalty(reading.hrv);
    score -= temperature_penalty(reading.temperature);
    score -= machine_stress_penalty(reading.machine_stress_index);
    score -= jerk_penalty(reading.jerk_count);

    score.clamp(SCORE_MIN, SCORE_MAX) as u8
}

/// Risk category for a CIS
pub fn risk_state(cis_score: u8) -> RiskState {
    if cis_score <= RISK_HIGH_MAX_SCORE {
        RiskState::High
    } else if cis_score <= RISK_MEDIUM_MAX_SCORE {
        RiskState::Medium
    } else {
        RiskState::Low
    }
}

/// Fatigue level = clamp((100 - cis) * 0.8, 0, 100)
pub fn fatigue_level(cis_score: u8) -> f64 {
    let deficit = (SCORE_MAX - cis_score as i32) as f64;
    (deficit * FATIGUE_FACTOR).clamp(SCORE_MIN as f64, SCORE_MAX as f64)
}

fn heart_rate_penalty(bpm: u16) -> i32 {
    if bpm > HEART_RATE_SEVERE_BPM {
        HEART_RATE_SEVERE_PENALTY
    } else if bpm > HEART_RATE_ELEVATED_BPM {
        HEART_RATE_ELEVATED_PENALTY
    } else if bpm < HEART_RATE_LOW_BPM {
        HEART_RATE_LOW_PENALTY
    } else {
        0
    }
}

fn hrv_penalty(hrv_ms: u16) -> i32 {
    if hrv_ms < HRV_CRITICAL_MS {
        HRV_CRITICAL_PENALTY
    } else if hrv_ms < HRV_LOW_MS {
        HRV_LOW_PENALTY
    } else {
        0
    }
}

fn temperature_penalty(celsius: f64) -> i32 {
    if celsius > BODY_TEMP_FEVER_C {
        BODY_TEMP_FEVER_PENALTY
    } else if celsius > BODY_TEMP_ELEVATED_C {
        BODY_TEMP_ELEVATED_PENALTY
    } else if celsius < BODY_TEMP_LOW_C {
        BODY_TEMP_LOW_PENALTY
    } else {
        0
    }
}

fn machine_stress_penalty(stress_index: u8) -> i32 {
    if stress_index > MACHINE_STRESS_HIGH {
        MACHINE_STRESS_HIGH_PENALTY
    } else if stress_index > MACHINE_STRESS_ELEVATED {
        MACHINE_STRESS_ELEVATED_PENALTY
    } else {
        0
    }
}

fn jerk_penalty(jerk_count: u32) -> i32 {
    // saturate before multiplying, the cap is reached at 8 jerks anyway
    let jerks = jerk_count.min(JERK_PENALTY_CAP as u32) as i32;
    (jerks * JERK_PENALTY_PER_EVENT).min(JERK_PENALTY_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(heart_rate: u16, hrv: u16, temperature: f64, stress: u8, jerks: u32) -> WorkerReading {
        WorkerReading {
            heart_rate,
            hrv,
            temperature,
            jerk_count: jerks,
            machine_stress_index: stress,
            vibration_rms: 0.0,
        }
    }

    #[test]
    fn healthy_worker_scores_100() {
        let a = WorkerScorer.score(&WorkerReading::default());
        assert_eq!(a.cis_score, 100);
        assert_eq!(a.risk_state, RiskState::Low);
    }

    #[test]
    fn everything_wrong_clamps_to_zero() {
        // 100 - 30 - 30 - 30 - 20 - 10 = -20
        let a = WorkerScorer.score(&reading(130, 15, 39.0, 80, 5));
        assert_eq!(a.cis_score, 0);
        assert_eq!(a.risk_state, RiskState::High);
    }

    #[test]
    fn heart_rate_bands_are_exclusive() {
        assert_eq!(cis_score(&reading(100, 55, 36.6, 0, 0)), 100);
        assert_eq!(cis_score(&reading(101, 55, 36.6, 0, 0)), 85);
        assert_eq!(cis_score(&reading(120, 55, 36.6, 0, 0)), 85);
        assert_eq!(cis_score(&reading(121, 55, 36.6, 0, 0)), 70);
        assert_eq!(cis_score(&reading(50, 55, 36.6, 0, 0)), 100);
        assert_eq!(cis_score(&reading(49, 55, 36.6, 0, 0)), 80);
    }

    #[test]
    fn temperature_bands() {
        assert_eq!(cis_score(&reading(72, 55, 37.5, 0, 0)), 100);
        assert_eq!(cis_score(&reading(72, 55, 37.6, 0, 0)), 85);
        assert_eq!(cis_score(&reading(72, 55, 38.6, 0, 0)), 70);
        assert_eq!(cis_score(&reading(72, 55, 35.4, 0, 0)), 80);
    }

    #[test]
    fn hrv_and_machine_stress_bands() {
        assert_eq!(cis_score(&reading(72, 34, 36.6, 0, 0)), 85);
        assert_eq!(cis_score(&reading(72, 19, 36.6, 0, 0)), 70);
        assert_eq!(cis_score(&reading(72, 55, 36.6, 51, 0)), 90);
        assert_eq!(cis_score(&reading(72, 55, 36.6, 71, 0)), 80);
    }

    #[test]
    fn jerk_penalty_is_capped() {
        assert_eq!(cis_score(&reading(72, 55, 36.6, 0, 3)), 94);
        assert_eq!(cis_score(&reading(72, 55, 36.6, 0, 8)), 85);
        assert_eq!(cis_score(&reading(72, 55, 36.6, 0, u32::MAX)), 85);
    }

    #[test]
    fn risk_state_boundaries() {
        assert_eq!(risk_state(0), RiskState::High);
        assert_eq!(risk_state(30), RiskState::High);
        assert_eq!(risk_state(31), RiskState::Medium);
        assert_eq!(risk_state(70), RiskState::Medium);
        assert_eq!(risk_state(71), RiskState::Low);
        assert_eq!(risk_state(100), RiskState::Low);
    }

    #[test]
    fn fatigue_tracks_cis_deficit() {
        assert_eq!(fatigue_level(100), 0.0);
        assert_eq!(fatigue_level(50), 40.0);
        assert_eq!(fatigue_level(0), 80.0);
    }
}
