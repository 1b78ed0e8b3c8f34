//! Aura history record schemas
//!
//! One record per scored sample, with the raw reading and the assessment
//! side by side. Categorical fields are Avro enums whose symbols match the
//! JSON names used everywhere else.

use apache_avro::Schema;
use serde_json::json;

use crate::SchemaError;

/// Qualified name of the worker vitals schema
pub const WORKER_VITALS_V1: &str = "worker_vitals_v1";

/// Qualified name of the machine telemetry schema
pub const MACHINE_TELEMETRY_V1: &str = "machine_telemetry_v1";

/// `RiskState` symbols in declaration order
pub const RISK_STATE_SYMBOLS: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];

/// `MachineStatus` symbols in declaration order
pub const MACHINE_STATUS_SYMBOLS: [&str; 4] = ["OPERATIONAL", "WARNING", "MAINTENANCE", "OFFLINE"];

/// `MaintenanceState` symbols in declaration order
pub const MAINTENANCE_STATE_SYMBOLS: [&str; 4] = ["normal", "attention", "warning", "critical"];

/// Worker vitals history record v1
pub fn worker_vitals_v1() -> Result<Schema, SchemaError> {
    let schema_json = json!({
        "namespace": "io.aura.history.v1",
        "type": "record",
        "name": "WorkerVitals",
        "doc": "Scored worker vitals sample",
        "fields": [
            {
                "name": "worker_id",
                "type": "string"
            },
            {
                "name": "timestamp",
                "type": "long",
                "logicalType": "timestamp-millis",
                "doc": "Recording time in milliseconds since epoch"
            },
            {
                "name": "heart_rate",
                "type": "int",
                "doc": "bpm, 40-220"
            },
            {
                "name": "hrv",
                "type": "int",
                "doc": "Heart rate variability in ms, 0-200"
            },
            {
                "name": "temperature",
                "type": "double",
                "doc": "Body temperature in celsius"
            },
            {
                "name": "jerk_count",
                "type": "long",
                "default": 0
            },
            {
                "name": "machine_stress_index",
                "type": "int",
                "default": 0
            },
            {
                "name": "vibration_rms",
                "type": "double",
                "default": 0.0
            },
            {
                "name": "cis_score",
                "type": "int",
                "doc": "Composite Index Score, 0-100"
            },
            {
                "name": "risk_state",
                "type": {
                    "type": "enum",
                    "name": "RiskState",
                    "symbols": RISK_STATE_SYMBOLS
                }
            }
        ]
    });

    Schema::parse(&schema_json)
        .map_err(|e| SchemaError::ParseError(e.to_string()))
}

/// Machine telemetry history record v1
pub fn machine_telemetry_v1() -> Result<Schema, SchemaError> {
    let schema_json = json!({
        "namespace": "io.aura.history.v1",
        "type": "record",
        "name": "MachineTelemetry",
        "doc": "Scored machine telemetry sample",
        "fields": [
            {
                "name": "machine_id",
                "type": "string"
            },
            {
                "name": "timestamp",
                "type": "long",
                "logicalType": "timestamp-millis"
            },
            {
                "name": "stress_index",
                "type": "int",
                "default": 0
            },
            {
                "name": "temperature",
                "type": "double",
                "doc": "Operating temperature in celsius"
            },
            {
                "name": "vibration_rms",
                "type": "double",
                "default": 0.0
            },
            {
                "name": "operating_hours",
                "type": "double",
                "default": 0.0
            },
            {
                "name": "fuel_level",
                "type": "int",
                "default": 100
            },
            {
                "name": "oil_pressure",
                "type": "int",
                "default": 40,
                "doc": "psi"
            },
            {
                "name": "health_score",
                "type": "int"
            },
            {
                "name": "failure_probability",
                "type": "int"
            },
            {
                "name": "status",
                "type": {
                    "type": "enum",
                    "name": "MachineStatus",
                    "symbols": MACHINE_STATUS_SYMBOLS
                }
            },
            {
                "name": "predicted_maintenance_days",
                "type": "int"
            },
            {
                "name": "maintenance_state",
                "type": {
                    "type": "enum",
                    "name": "MaintenanceState",
                    "symbols": MAINTENANCE_STATE_SYMBOLS
                }
            },
            {
                "name": "rpm_instability",
                "type": ["null", "double"],
                "default": null,
                "doc": "Generator rpm instability, 0-1; null for ingested samples"
            }
        ]
    });

    Schema::parse(&schema_json)
        .map_err(|e| SchemaError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::{MachineStatus, MaintenanceState, RiskState};

    #[test]
    fn parse_worker_vitals_schema() {
        let schema = worker_vitals_v1().unwrap();
        assert!(matches!(schema, Schema::Record(_)));
    }

    #[test]
    fn parse_machine_telemetry_schema() {
        let schema = machine_telemetry_v1().unwrap();
        assert!(matches!(schema, Schema::Record(_)));
    }

    #[test]
    fn symbols_match_json_names() {
        for (symbol, state) in RISK_STATE_SYMBOLS.iter().zip([RiskState::Low, RiskState::Medium, RiskState::High]) {
            assert_eq!(*symbol, state.as_str());
        }
        let statuses = [
            MachineStatus::Operational,
            MachineStatus::Warning,
            MachineStatus::Maintenance,
            MachineStatus::Offline,
        ];
        for (symbol, status) in MACHINE_STATUS_SYMBOLS.iter().zip(statuses) {
            assert_eq!(*symbol, status.as_str());
        }
        let states = [
            MaintenanceState::Normal,
            MaintenanceState::Attention,
            MaintenanceState::Warning,
            MaintenanceState::Critical,
        ];
        for (symbol, state) in MAINTENANCE_STATE_SYMBOLS.iter().zip(states) {
            assert_eq!(*symbol, state.as_str());
        }
    }
}
