//! Registrations, views and other service-level records

use aura_core::{
    MachineAssessment, MachineReading, MachineTelemetryEntry, MachineType, Timestamp,
    WorkerAssessment, WorkerReading, WorkerVitalsEntry,
};
use serde::{Deserialize, Serialize};

/// Request to register a worker
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewWorker {
    pub worker_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl NewWorker {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// Request to register a machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMachine {
    pub machine_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

impl NewMachine {
    pub fn new(machine_id: impl Into<String>, name: impl Into<String>, machine_type: MachineType) -> Self {
        Self {
            machine_id: machine_id.into(),
            name: name.into(),
            machine_type,
            model: None,
            serial_number: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }
}

/// Registered worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRegistration {
    pub worker_id: String,
    pub name: Option<String>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl WorkerRegistration {
    pub fn new(request: NewWorker, created_at: Timestamp) -> Self {
        Self {
            worker_id: request.worker_id,
            name: request.name,
            department: request.department,
            is_active: true,
            created_at,
        }
    }
}

/// Registered machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRegistration {
    pub machine_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl MachineRegistration {
    pub fn new(request: NewMachine, created_at: Timestamp) -> Self {
        Self {
            machine_id: request.machine_id,
            name: request.name,
            machine_type: request.machine_type,
            model: request.model,
            serial_number: request.serial_number,
            is_active: true,
            created_at,
        }
    }
}

/// Worker vitals entry as the dashboard sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerVitalsRecord {
    #[serde(flatten)]
    pub entry: WorkerVitalsEntry,
    /// A break was issued while this was the worker's latest entry
    pub break_flag: bool,
}

/// Latest state of a worker, flattened into its view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkerState {
    #[serde(flatten)]
    pub reading: WorkerReading,
    #[serde(flatten)]
    pub assessment: WorkerAssessment,
    pub break_flag: bool,
    pub last_updated: Timestamp,
}

impl WorkerState {
    pub fn from_record(record: &WorkerVitalsRecord) -> Self {
        Self {
            reading: record.entry.reading,
            assessment: record.entry.assessment,
            break_flag: record.break_flag,
            last_updated: record.entry.timestamp,
        }
    }
}

/// Worker registration with its latest state, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerView {
    #[serde(flatten)]
    pub registration: WorkerRegistration,
    #[serde(flatten)]
    pub latest: Option<WorkerState>,
}

/// Latest state of a machine, flattened into its view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MachineState {
    #[serde(flatten)]
    pub reading: MachineReading,
    #[serde(flatten)]
    pub assessment: MachineAssessment,
    pub last_updated: Timestamp,
}

impl MachineState {
    pub fn from_entry(entry: &MachineTelemetryEntry) -> Self {
        Self {
            reading: entry.reading,
            assessment: entry.assessment,
            last_updated: entry.timestamp,
        }
    }
}

/// Machine registration with its latest state, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineView {
    #[serde(flatten)]
    pub registration: MachineRegistration,
    #[serde(flatten)]
    pub latest: Option<MachineState>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerList {
    pub workers: Vec<WorkerView>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineList {
    pub machines: Vec<MachineView>,
    pub total: usize,
}

/// Worker vitals within a time window, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerHistory {
    pub worker_id: String,
    pub history: Vec<WorkerVitalsRecord>,
}

/// Machine telemetry within a time window, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineHistory {
    pub machine_id: String,
    pub history: Vec<MachineTelemetryEntry>,
}

/// Acknowledgement of an issued break
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakIssued {
    pub worker_id: String,
    /// Timestamp of the vitals entry the break applies to
    pub entry_timestamp: Timestamp,
    pub message: String,
}

/// Liveness report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub name: String,
    pub version: &'static str,
    pub notifications: aura_connectors::ConnectionStats,
}

/// Outcome of one simulation tick over the active fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SimulationTick {
    pub workers: usize,
    pub machines: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::{Scorer, WorkerScorer};
    use serde_json::json;

    #[test]
    fn machine_request_uses_type_key() {
        let request: NewMachine =
            serde_json::from_value(json!({"machine_id": "MCH-1000", "name": "Crane-01", "type": "CRANE"})).unwrap();
        assert_eq!(request.machine_type, MachineType::Crane);
        assert_eq!(request.model, None);
    }

    #[test]
    fn view_without_state_has_only_registration() {
        let view = WorkerView {
            registration: WorkerRegistration::new(NewWorker::new("WK-1").name("Ada"), 5),
            latest: None,
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["worker_id"], "WK-1");
        assert_eq!(value["is_active"], true);
        assert!(value.get("cis_score").is_none());
    }

    #[test]
    fn view_with_state_is_flat() {
        let reading = WorkerReading::default();
        let entry = WorkerVitalsEntry::new("WK-1", reading, WorkerScorer.score(&reading), 10);
        let record = WorkerVitalsRecord { entry, break_flag: true };
        let view = WorkerView {
            registration: WorkerRegistration::new(NewWorker::new("WK-1"), 5),
            latest: Some(WorkerState::from_record(&record)),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["cis_score"], 100);
        assert_eq!(value["risk_state"], "LOW");
        assert_eq!(value["break_flag"], true);
        assert_eq!(value["last_updated"], 10);
        assert_eq!(value["created_at"], 5);
    }
}
