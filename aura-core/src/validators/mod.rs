//! Payload Validators
//!
//! Validators sit at the boundary: they run on readings supplied by devices
//! (or by any other external caller) before the reading reaches a scorer.
//! Generated readings never pass through them because the generator clamps
//! every field to the same bounds.
//!
//! Each validator checks fields in payload order and reports the first
//! violation, naming the field so the HTTP adapter can return it verbatim.
//!
//! ```rust
//! use aura_core::{MachineReading, MachineValidator, Validator};
//!
//! let reading = MachineReading { temperature: 62.5, oil_pressure: 42, ..Default::default() };
//! MachineValidator::default().validate(&reading)?;
//! # Ok::<(), aura_core::TelemetryError>(())
//! ```

mod machine;
mod utils;
mod worker;

pub use machine::MachineValidator;
pub use worker::WorkerValidator;
