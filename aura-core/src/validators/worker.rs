//! Worker vitals payload validator

use crate::{
    constants::worker::*,
    errors::TelemetryResult,
    readings::WorkerReading,
    traits::Validator,
};

use super::utils;

/// Validator for worker vitals payloads
#[derive(Debug, Clone)]
pub struct WorkerValidator {
    heart_rate: (u16, u16),
    hrv: (u16, u16),
    temperature: (f64, f64),
}

impl Default for WorkerValidator {
    fn default() -> Self {
        Self {
            heart_rate: (HEART_RATE_MIN_BPM, HEART_RATE_MAX_BPM),
            hrv: (HRV_MIN_MS, HRV_MAX_MS),
            temperature: (BODY_TEMP_MIN_C, BODY_TEMP_MAX_C),
        }
    }
}

impl Validator for WorkerValidator {
    type Reading = WorkerReading;

    fn validate(&self, reading: &WorkerReading) -> TelemetryResult<()> {
        utils::check_int("heart_rate", reading.heart_rate, self.heart_rate.0, self.heart_rate.1)?;
        utils::check_int("hrv", reading.hrv, self.hrv.0, self.hrv.1)?;
        utils::check_float("temperature", reading.temperature, self.temperature.0, self.temperature.1)?;
        utils::check_int(
            "machine_stress_index",
            reading.machine_stress_index,
            STRESS_INDEX_MIN,
            STRESS_INDEX_MAX,
        )?;
        utils::check_non_negative("vibration_rms", reading.vibration_rms)?;
        // jerk_count is unsigned, any value is accepted
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TelemetryError;

    #[test]
    fn resting_worker_is_valid() {
        assert!(WorkerValidator::default().validate(&WorkerReading::default()).is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        let v = WorkerValidator::default();
        let low = WorkerReading { heart_rate: 40, hrv: 0, temperature: 30.0, ..Default::default() };
        let high = WorkerReading {
            heart_rate: 220,
            hrv: 200,
            temperature: 45.0,
            machine_stress_index: 100,
            ..Default::default()
        };
        assert!(v.validate(&low).is_ok());
        assert!(v.validate(&high).is_ok());
    }

    #[test]
    fn first_violation_is_reported() {
        let v = WorkerValidator::default();
        let reading = WorkerReading { heart_rate: 39, temperature: 50.0, ..Default::default() };
        match v.validate(&reading) {
            Err(TelemetryError::OutOfRange { field, min, .. }) => {
                assert_eq!(field, "heart_rate");
                assert_eq!(min, 40.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn stress_index_above_100_rejected() {
        let reading = WorkerReading { machine_stress_index: 101, ..Default::default() };
        assert!(WorkerValidator::default().validate(&reading).is_err());
    }

    #[test]
    fn nan_temperature_rejected() {
        let reading = WorkerReading { temperature: f64::NAN, ..Default::default() };
        assert_eq!(
            WorkerValidator::default().validate(&reading),
            Err(TelemetryError::InvalidValue { field: "temperature" })
        );
    }
}
