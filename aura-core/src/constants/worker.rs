//! Worker Vitals Bounds and CIS Scoring Bands
//!
//! Payload bounds mirror what the wearable firmware can physically report.
//! Penalty bands are applied independently per metric and summed.

// ===== PAYLOAD BOUNDS =====

/// Lowest heart rate the wearable reports (bpm).
pub const HEART_RATE_MIN_BPM: u16 = 40;

/// Highest heart rate the wearable reports (bpm).
pub const HEART_RATE_MAX_BPM: u16 = 220;

/// Lowest heart rate variability (ms RMSSD).
pub const HRV_MIN_MS: u16 = 0;

/// Highest heart rate variability (ms RMSSD).
pub const HRV_MAX_MS: u16 = 200;

/// Lowest accepted skin/body temperature (°C).
pub const BODY_TEMP_MIN_C: f64 = 30.0;

/// Highest accepted skin/body temperature (°C).
pub const BODY_TEMP_MAX_C: f64 = 45.0;

/// Machine stress index bounds as seen from the worker's wearable.
pub const STRESS_INDEX_MIN: u8 = 0;
pub const STRESS_INDEX_MAX: u8 = 100;

// ===== HEART RATE BANDS =====

/// Severe tachycardia threshold (bpm, exclusive).
pub const HEART_RATE_SEVERE_BPM: u16 = 120;
pub const HEART_RATE_SEVERE_PENALTY: i32 = 30;

/// Elevated heart rate threshold (bpm, exclusive).
pub const HEART_RATE_ELEVATED_BPM: u16 = 100;
pub const HEART_RATE_ELEVATED_PENALTY: i32 = 15;

/// Bradycardia threshold (bpm, exclusive).
pub const HEART_RATE_LOW_BPM: u16 = 50;
pub const HEART_RATE_LOW_PENALTY: i32 = 20;

// ===== HRV BANDS =====
// Low HRV means high physiological stress.

pub const HRV_CRITICAL_MS: u16 = 20;
pub const HRV_CRITICAL_PENALTY: i32 = 30;

pub const HRV_LOW_MS: u16 = 35;
pub const HRV_LOW_PENALTY: i32 = 15;

// ===== BODY TEMPERATURE BANDS =====

/// Fever threshold (°C, exclusive).
pub const BODY_TEMP_FEVER_C: f64 = 38.5;
pub const BODY_TEMP_FEVER_PENALTY: i32 = 30;

/// Heat strain threshold (°C, exclusive).
pub const BODY_TEMP_ELEVATED_C: f64 = 37.5;
pub const BODY_TEMP_ELEVATED_PENALTY: i32 = 15;

/// Hypothermia risk threshold (°C, exclusive).
pub const BODY_TEMP_LOW_C: f64 = 35.5;
pub const BODY_TEMP_LOW_PENALTY: i32 = 20;

// ===== NEARBY MACHINE STRESS BANDS =====

pub const MACHINE_STRESS_HIGH: u8 = 70;
pub const MACHINE_STRESS_HIGH_PENALTY: i32 = 20;

pub const MACHINE_STRESS_ELEVATED: u8 = 50;
pub const MACHINE_STRESS_ELEVATED_PENALTY: i32 = 10;

// ===== MOTION =====

/// Penalty per sudden movement.
pub const JERK_PENALTY_PER_EVENT: i32 = 2;

/// Cap on the total jerk penalty.
pub const JERK_PENALTY_CAP: i32 = 15;

// ===== RISK STATE CUT-OFFS =====

/// Scores at or below this are HIGH risk.
pub const RISK_HIGH_MAX_SCORE: u8 = 30;

/// Scores at or below this (and above HIGH) are MEDIUM risk.
pub const RISK_MEDIUM_MAX_SCORE: u8 = 70;

// ===== FATIGUE =====

/// Fatigue level = (100 - cis) * factor.
pub const FATIGUE_FACTOR: f64 = 0.8;
