//! Raw readings and the categories derived from them
//!
//! Readings are flat, immutable sets of measurements with fixed units. Field
//! names match the device payload so that serialized readings are accepted
//! by, and produced for, the dashboard without translation.

use core::fmt;
use core::str::FromStr;

use crate::errors::TelemetryError;
use alloc::string::ToString;

/// One sample from a worker-worn vitals sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerReading {
    /// Heart rate (bpm, 40-220)
    pub heart_rate: u16,
    /// Heart rate variability (ms, 0-200)
    pub hrv: u16,
    /// Body temperature (°C, 30-45)
    pub temperature: f64,
    /// Sudden movements since the previous sample
    #[cfg_attr(feature = "serde", serde(default))]
    pub jerk_count: u32,
    /// Stress index of the machine the worker operates (0-100)
    #[cfg_attr(feature = "serde", serde(default))]
    pub machine_stress_index: u8,
    /// Whole-body vibration (RMS)
    #[cfg_attr(feature = "serde", serde(default))]
    pub vibration_rms: f64,
}

impl Default for WorkerReading {
    /// A resting, healthy worker
    fn default() -> Self {
        Self {
            heart_rate: 72,
            hrv: 55,
            temperature: 36.6,
            jerk_count: 0,
            machine_stress_index: 0,
            vibration_rms: 0.0,
        }
    }
}

/// One sample from a machine's sensor package
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineReading {
    /// Composite mechanical stress (0-100)
    #[cfg_attr(feature = "serde", serde(default))]
    pub stress_index: u8,
    /// Operating temperature (°C, 0-200)
    pub temperature: f64,
    /// Vibration (RMS)
    #[cfg_attr(feature = "serde", serde(default))]
    pub vibration_rms: f64,
    /// Hours of operation today
    #[cfg_attr(feature = "serde", serde(default))]
    pub operating_hours: f64,
    /// Fuel level (%)
    pub fuel_level: u8,
    /// Oil pressure (psi, 0-100)
    pub oil_pressure: u8,
}

impl Default for MachineReading {
    /// An idle machine with a full tank
    fn default() -> Self {
        Self {
            stress_index: 0,
            temperature: 40.0,
            vibration_rms: 0.0,
            operating_hours: 0.0,
            fuel_level: 100,
            oil_pressure: 40,
        }
    }
}

/// Worker risk category, higher CIS means lower risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RiskState {
    Low,
    Medium,
    High,
}

impl RiskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Machine operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MachineStatus {
    Operational,
    Warning,
    Maintenance,
    /// Reported by devices going dark; never produced by scoring
    Offline,
}

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "OPERATIONAL",
            Self::Warning => "WARNING",
            Self::Maintenance => "MAINTENANCE",
            Self::Offline => "OFFLINE",
        }
    }
}

/// Descriptive maintenance label derived from the health score alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaintenanceState {
    Normal,
    Attention,
    Warning,
    Critical,
}

impl MaintenanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Attention => "attention",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// Category a synthetic reading should be pushed toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TargetState {
    Good,
    Fair,
    Poor,
}

impl TargetState {
    /// All targets, best first
    pub const ALL: [TargetState; 3] = [TargetState::Good, TargetState::Fair, TargetState::Poor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl FromStr for TargetState {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(TelemetryError::InvalidValue { field: "target_state" }),
        }
    }
}

/// Kind of site machine, selects the baseline profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MachineType {
    Crane,
    Excavator,
    Loader,
    Drill,
    Compressor,
    Generator,
}

impl MachineType {
    /// Every machine type with a profile
    pub const ALL: [MachineType; 6] = [
        MachineType::Crane,
        MachineType::Excavator,
        MachineType::Loader,
        MachineType::Drill,
        MachineType::Compressor,
        MachineType::Generator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crane => "CRANE",
            Self::Excavator => "EXCAVATOR",
            Self::Loader => "LOADER",
            Self::Drill => "DRILL",
            Self::Compressor => "COMPRESSOR",
            Self::Generator => "GENERATOR",
        }
    }
}

impl FromStr for MachineType {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TelemetryError::UnknownMachineType(s.to_string()))
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(RiskState, MachineStatus, MaintenanceState, TargetState, MachineType);
