//! Machine Telemetry Bounds and Health Scoring Bands
//!
//! Health penalties follow the same shape as the worker CIS: start from a
//! perfect 100, subtract the first matching band per metric, clamp.

// ===== PAYLOAD BOUNDS =====

/// Lowest accepted operating temperature (°C).
pub const MACHINE_TEMP_MIN_C: f64 = 0.0;

/// Highest accepted operating temperature (°C).
pub const MACHINE_TEMP_MAX_C: f64 = 200.0;

/// Percent-style fields (stress index, fuel level) and oil pressure (psi).
pub const PERCENT_MIN: u8 = 0;
pub const PERCENT_MAX: u8 = 100;

// ===== STRESS INDEX BANDS =====

pub const STRESS_SEVERE: u8 = 80;
pub const STRESS_SEVERE_PENALTY: i32 = 30;
pub const STRESS_HIGH: u8 = 60;
pub const STRESS_HIGH_PENALTY: i32 = 15;
pub const STRESS_MODERATE: u8 = 40;
pub const STRESS_MODERATE_PENALTY: i32 = 5;

// ===== TEMPERATURE BANDS (°C) =====

pub const TEMP_OVERHEAT_C: f64 = 90.0;
pub const TEMP_OVERHEAT_PENALTY: i32 = 30;
pub const TEMP_HOT_C: f64 = 75.0;
pub const TEMP_HOT_PENALTY: i32 = 15;
pub const TEMP_WARM_C: f64 = 60.0;
pub const TEMP_WARM_PENALTY: i32 = 5;

// ===== VIBRATION BANDS (RMS) =====

pub const VIBRATION_SEVERE_RMS: f64 = 3.0;
pub const VIBRATION_SEVERE_PENALTY: i32 = 25;
pub const VIBRATION_HIGH_RMS: f64 = 2.0;
pub const VIBRATION_HIGH_PENALTY: i32 = 15;
pub const VIBRATION_ELEVATED_RMS: f64 = 1.5;
pub const VIBRATION_ELEVATED_PENALTY: i32 = 5;

// ===== OIL PRESSURE BANDS (psi) =====

pub const OIL_CRITICAL_PSI: u8 = 20;
pub const OIL_CRITICAL_PENALTY: i32 = 25;
pub const OIL_LOW_PSI: u8 = 30;
pub const OIL_LOW_PENALTY: i32 = 10;

// ===== FAILURE PROBABILITY ADJUSTMENTS =====

pub const FAILURE_VIBRATION_RMS: f64 = 2.5;
pub const FAILURE_VIBRATION_BONUS: i32 = 15;
pub const FAILURE_TEMP_C: f64 = 80.0;
pub const FAILURE_TEMP_BONUS: i32 = 10;
pub const FAILURE_OIL_PSI: u8 = 25;
pub const FAILURE_OIL_BONUS: i32 = 15;

// ===== STATUS CUT-OFFS =====

/// Health strictly below this forces MAINTENANCE.
pub const STATUS_MAINTENANCE_HEALTH_BELOW: u8 = 40;

/// Failure probability strictly above this forces MAINTENANCE.
pub const STATUS_MAINTENANCE_FAILURE_ABOVE: u8 = 70;

/// Health strictly below this is at least WARNING.
pub const STATUS_WARNING_HEALTH_BELOW: u8 = 60;

/// Failure probability strictly above this is at least WARNING.
pub const STATUS_WARNING_FAILURE_ABOVE: u8 = 50;

/// Days until maintenance = (100 - failure) / divisor, at least 1.
pub const MAINTENANCE_DAYS_DIVISOR: u8 = 3;

// ===== MAINTENANCE STATE CUT-OFFS =====

pub const MAINTENANCE_NORMAL_MIN_HEALTH: u8 = 80;
pub const MAINTENANCE_ATTENTION_MIN_HEALTH: u8 = 60;
pub const MAINTENANCE_WARNING_MIN_HEALTH: u8 = 40;

// ===== UNIT CONVERSION =====

/// Normalized vibration [0, 1] to RMS units.
pub const VIBRATION_RMS_PER_NORM: f64 = 4.0;

/// Run minutes per operating hour.
pub const MINUTES_PER_HOUR: f64 = 60.0;
