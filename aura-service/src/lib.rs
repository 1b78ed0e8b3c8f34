//! Site safety service for Aura
//!
//! The facade a dashboard backend embeds: registration of workers and
//! machines, device ingest, synthetic generation for demos, latest-state
//! views, windowed history, break flags, the header summary and Avro
//! archival of history.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use aura_connectors::RecordingSink;
//! use aura_core::{FixedTime, MachineType, TargetState, WorkerReading};
//! use aura_service::{NewMachine, SafetyService, ServiceConfig};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let service = SafetyService::new(ServiceConfig::new().seed(7))
//!     .unwrap()
//!     .with_clock(Arc::new(FixedTime::new(1_700_000_000_000)))
//!     .with_sink(sink.clone());
//!
//! // Unknown workers are registered on first ingest
//! let record = service.ingest_worker_vitals("WK-7822", WorkerReading::default()).unwrap();
//! assert_eq!(record.entry.assessment.cis_score, 100);
//!
//! service.register_machine(NewMachine::new("CR-01", "Tower crane", MachineType::Crane)).unwrap();
//! let entry = service.generate_machine_telemetry("CR-01", Some(TargetState::Poor)).unwrap();
//! assert_eq!(entry.assessment.status.as_str(), "MAINTENANCE");
//!
//! assert_eq!(sink.payloads().len(), 2);
//! assert_eq!(service.dashboard_stats().unwrap().total_active_workers, 1);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod payload;
pub mod repository;
pub mod service;

pub use config::ServiceConfig;
pub use dashboard::{DashboardStats, SystemStatus};
pub use error::{ServiceError, ServiceResult};
pub use models::{
    BreakIssued, MachineHistory, MachineList, MachineRegistration, MachineState, MachineView,
    NewMachine, NewWorker, ServiceHealth, SimulationTick, WorkerHistory, WorkerList,
    WorkerRegistration, WorkerState, WorkerVitalsRecord, WorkerView,
};
pub use repository::{InMemoryRepository, MachineStore, TelemetryRepository, WorkerStore};
pub use service::SafetyService;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
