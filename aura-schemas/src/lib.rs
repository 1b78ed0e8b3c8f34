//! Avro Schemas for Aura History Records
//!
//! ## Overview
//!
//! Every scored sample Aura records, worker vitals or machine telemetry, can
//! be written out as an Avro record. The live store keeps a short window;
//! archives outlive it, so the archive format has to be self-describing and
//! able to evolve.
//!
//! ## Why Avro?
//!
//! 1. **Compact Binary Format**: a day of one-minute samples per machine is
//!    small enough to ship anywhere
//! 2. **Schema Evolution**: new sensor fields get appended with defaults
//! 3. **Self-Describing**: object containers carry their writer schema
//!
//! ## Schema Evolution Strategy
//!
//! 1. **Always Append**: new fields are added, never removed
//! 2. **Default Values**: optional payload fields carry defaults
//! 3. **Version in Name**: `worker_vitals_v1`, `machine_telemetry_v1`
//!
//! ## Record Layout
//!
//! ```json
//! {
//!   "type": "record",
//!   "name": "WorkerVitals",
//!   "fields": [
//!     {"name": "worker_id", "type": "string"},
//!     {"name": "timestamp", "type": "long"},
//!     {"name": "heart_rate", "type": "int"},
//!     ...
//!     {"name": "cis_score", "type": "int"},
//!     {"name": "risk_state", "type": {"type": "enum", "symbols": ["LOW", "MEDIUM", "HIGH"]}}
//!   ]
//! }
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use aura_core::{Scorer, WorkerReading, WorkerScorer, WorkerVitalsEntry};
//! use aura_schemas::{HistoryCodec, SchemaRegistry};
//!
//! let registry = SchemaRegistry::with_defaults()?;
//! let codec = HistoryCodec::new(&registry)?;
//!
//! let reading = WorkerReading::default();
//! let entry = WorkerVitalsEntry::new("WK-1", reading, WorkerScorer.score(&reading), 0);
//! let archive = codec.archive_workers([&entry])?;
//! assert_eq!(codec.read_worker_archive(&archive)?, vec![entry]);
//! # Ok::<(), aura_schemas::SchemaError>(())
//! ```

pub mod codec;
pub mod registry;
pub mod schemas;

pub use codec::HistoryCodec;
pub use registry::{SchemaMetadata, SchemaRegistry, GLOBAL_REGISTRY};

/// Schema-related errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum SchemaError {
    #[error("Failed to parse schema: {0}")]
    ParseError(String),

    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to encode record: {0}")]
    Encode(String),

    #[error("Failed to decode record: {0}")]
    Decode(String),

    #[error("Schema registry lock poisoned")]
    Poisoned,
}
