//! Synthetic Telemetry Generation for Aura
//!
//! ## Overview
//!
//! Produces realistic worker vitals and machine telemetry for demos, load
//! tests and dashboards without hardware on site. Every generated sample is
//! scored with the same scorers that score real payloads, so a generated
//! sample and an ingested one are indistinguishable downstream.
//!
//! ## Generation Modes
//!
//! ```text
//! previous  target   mode
//! --------  ------   -----------------------------------------------
//! none      none     cold start: uniform draw from baseline ranges
//! some      none     incremental: bounded random walk per metric
//! any       some     biased: banded metrics drawn from the target band
//! ```
//!
//! Incremental generation is what makes a stream look like a stream: no
//! metric moves by more than its declared step between two samples, and
//! nothing ever leaves its hard bounds.
//!
//! ## Domains
//!
//! A domain is a [`TelemetryModel`]: a metric table plus the mapping between
//! sampled metrics and the stored reading. Two domains ship with the crate:
//!
//! - [`worker::WorkerModel`]: heart rate, HRV, body temperature, stress, motion
//! - [`machine::MachineModel`]: one per [`aura_core::MachineType`], cold
//!   starts drawn from the type's profile
//!
//! ## Randomness
//!
//! Generators hold no random state. The caller passes any [`rand::Rng`],
//! which makes runs reproducible with a seeded `StdRng`:
//!
//! ```rust
//! use aura_sim::{EngineConfig, WorkerGenerator};
//!
//! let mut rng = EngineConfig::new().seed(42).rng();
//! let generator = WorkerGenerator::default();
//!
//! let first = generator.generate(None, None, &mut rng);
//! let next = generator.generate(Some(&first.reading), None, &mut rng);
//! assert!(first.reading.heart_rate.abs_diff(next.reading.heart_rate) <= 3);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod machine;
pub mod sampling;
pub mod worker;

pub use config::{EngineConfig, ShockProbability};
pub use engine::{Generator, Mode, TelemetryModel};
pub use machine::{
    GeneratedMachine, MachineAnchor, MachineGenerator, MachineGenerators, MachineModel, MachineSignals,
};
pub use sampling::{MetricSpec, TargetBands};
pub use worker::{GeneratedWorker, WorkerGenerator, WorkerModel};
