//! Machine telemetry payload validator

use crate::{
    constants::machine::*,
    errors::TelemetryResult,
    readings::MachineReading,
    traits::Validator,
};

use super::utils;

/// Validator for machine telemetry payloads
#[derive(Debug, Clone)]
pub struct MachineValidator {
    temperature: (f64, f64),
}

impl Default for MachineValidator {
    fn default() -> Self {
        Self {
            temperature: (MACHINE_TEMP_MIN_C, MACHINE_TEMP_MAX_C),
        }
    }
}

impl Validator for MachineValidator {
    type Reading = MachineReading;

    fn validate(&self, reading: &MachineReading) -> TelemetryResult<()> {
        utils::check_int("stress_index", reading.stress_index, PERCENT_MIN, PERCENT_MAX)?;
        utils::check_float("temperature", reading.temperature, self.temperature.0, self.temperature.1)?;
        utils::check_non_negative("vibration_rms", reading.vibration_rms)?;
        utils::check_non_negative("operating_hours", reading.operating_hours)?;
        utils::check_int("fuel_level", reading.fuel_level, PERCENT_MIN, PERCENT_MAX)?;
        utils::check_int("oil_pressure", reading.oil_pressure, PERCENT_MIN, PERCENT_MAX)?;
        Ok(())
    }
}
