//! Outbound notification payloads
//!
//! Each scored sample is reshaped into grouped JSON for downstream
//! consumers. Groups are stable; consumers key on them, not on the flat
//! history columns.

use aura_core::{
    constants::machine::{TEMP_HOT_C, TEMP_OVERHEAT_C, TEMP_WARM_C},
    MachineTelemetryEntry, MachineType, WorkerVitalsEntry,
};
use aura_sim::MachineSignals;
use serde_json::{json, Value};

/// Where a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Ingest,
    Generated,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingest => "ingest",
            Self::Generated => "generated",
        }
    }
}

/// Coarse thermal label for an engine temperature
pub fn temperature_band(engine_temp: f64) -> &'static str {
    if engine_temp > TEMP_OVERHEAT_C {
        "overheat"
    } else if engine_temp > TEMP_HOT_C {
        "hot"
    } else if engine_temp > TEMP_WARM_C {
        "warm"
    } else {
        "normal"
    }
}

pub fn worker_payload(entry: &WorkerVitalsEntry, source: Source) -> Value {
    let reading = &entry.reading;
    json!({
        "entity_id": entry.worker_id,
        "kind": "worker",
        "source": source.as_str(),
        "timestamp": entry.timestamp,
        "physiological": {
            "heart_rate": reading.heart_rate,
            "hrv": reading.hrv,
            "body_temperature": reading.temperature,
            "fatigue_level": entry.assessment.fatigue_level(),
        },
        "environmental": {
            "machine_stress_index": reading.machine_stress_index,
            "vibration_rms": reading.vibration_rms,
        },
        "motion": {
            "jerk_count": reading.jerk_count,
        },
        "assessment": {
            "cis_score": entry.assessment.cis_score,
            "risk_state": entry.assessment.risk_state.as_str(),
        },
    })
}

/// `signals` are the generator's own for generated samples and
/// [`MachineSignals::from_reading`] for ingested ones. `sensor_health` is
/// reported alongside, never in place of, the scored health.
pub fn machine_payload(
    entry: &MachineTelemetryEntry,
    machine_type: MachineType,
    signals: &MachineSignals,
    sensor_health: f64,
    source: Source,
) -> Value {
    let reading = &entry.reading;
    let assessment = &entry.assessment;
    json!({
        "entity_id": entry.machine_id,
        "kind": "machine",
        "machine_type": machine_type.as_str(),
        "source": source.as_str(),
        "timestamp": entry.timestamp,
        "operational_intensity": {
            "stress_index": reading.stress_index,
            "continuous_run_minutes": signals.run_minutes,
            "operating_hours": reading.operating_hours,
            "fuel_level": reading.fuel_level,
        },
        "mechanical_stress": {
            "vibration_rms": reading.vibration_rms,
            "vibration_norm": signals.vibration_norm,
            "rpm_instability": signals.rpm_instability,
            "shock_event": signals.shock_event,
        },
        "thermal_stress": {
            "engine_temp": signals.engine_temp,
            "temperature_band": temperature_band(signals.engine_temp),
        },
        "usage_fatigue": {
            "operating_hours": reading.operating_hours,
            "predicted_maintenance_days": assessment.predicted_maintenance_days,
        },
        "health_context": {
            "health_score": assessment.health_score,
            "sensor_health": sensor_health,
            "failure_probability": assessment.failure_probability,
            "status": assessment.status.as_str(),
            "maintenance_state": assessment.maintenance_state.as_str(),
        },
    })
}
