//! History entries
//!
//! One entry per scored sample: the raw reading, its assessment and the
//! time it was recorded. Entries are never modified after they are built;
//! an entity's current state is simply its newest entry.

use alloc::string::String;

use crate::{
    readings::{MachineReading, WorkerReading},
    scoring::{MachineAssessment, WorkerAssessment},
    time::Timestamp,
};

/// Persisted worker vitals sample
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerVitalsEntry {
    pub worker_id: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub reading: WorkerReading,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub assessment: WorkerAssessment,
    pub timestamp: Timestamp,
}

impl WorkerVitalsEntry {
    pub fn new(
        worker_id: impl Into<String>,
        reading: WorkerReading,
        assessment: WorkerAssessment,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            reading,
            assessment,
            timestamp,
        }
    }
}

/// Persisted machine telemetry sample
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineTelemetryEntry {
    pub machine_id: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub reading: MachineReading,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub assessment: MachineAssessment,
    pub timestamp: Timestamp,
    /// RPM instability (0-1) a synthetic sample was generated with. The
    /// reading's stress index also folds in shocks and temperature, so the
    /// value cannot be recovered from it. `None` for ingested samples.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rpm_instability: Option<f64>,
}

impl MachineTelemetryEntry {
    pub fn new(
        machine_id: impl Into<String>,
        reading: MachineReading,
        assessment: MachineAssessment,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            machine_id: machine_id.into(),
            reading,
            assessment,
            timestamp,
            rpm_instability: None,
        }
    }

    /// Attach the generator's rpm instability
    pub fn with_rpm_instability(mut self, rpm_instability: f64) -> Self {
        self.rpm_instability = Some(rpm_instability);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MachineScorer, Scorer, WorkerScorer};

    #[test]
    fn worker_entry_serializes_flat() {
        let reading = WorkerReading::default();
        let entry = WorkerVitalsEntry::new("WK-7822", reading, WorkerScorer.score(&reading), 1_000);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["worker_id"], "WK-7822");
        assert_eq!(json["heart_rate"], 72);
        assert_eq!(json["cis_score"], 100);
        assert_eq!(json["risk_state"], "LOW");
        assert_eq!(json["timestamp"], 1_000);
    }

    #[test]
    fn machine_entry_serializes_flat() {
        let reading = MachineReading::default();
        let entry = MachineTelemetryEntry::new("MCH-1000", reading, MachineScorer.score(&reading), 5);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["machine_id"], "MCH-1000");
        assert_eq!(json["status"], "OPERATIONAL");
        assert_eq!(json["maintenance_state"], "normal");
        assert_eq!(json["predicted_maintenance_days"], 33);

        let generated = entry.with_rpm_instability(0.4);
        assert_eq!(generated.rpm_instability, Some(0.4));
        assert!(serde_json::to_value(&generated).unwrap().get("rpm_instability").is_none());
    }
}
