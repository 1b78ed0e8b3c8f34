//! Error Types for Telemetry Validation and Lookup
//!
//! ## Error Categories
//!
//! ### Domain Validation
//! - `OutOfRange`: a supplied field lies outside its declared bounds
//! - `InvalidValue`: a float field is NaN or infinite
//!
//! ### Lookup
//! - `NotFound`: an operation named an entity nobody registered
//! - `AlreadyExists`: a registration collided with an existing entity
//! - `UnknownMachineType`: a machine type string matched no profile
//!
//! The scorers and generators never produce errors: all arithmetic is
//! clamped and every random draw is bounded. Errors only come from the
//! boundary (validation) and from entity lookup.
//!
//! ```rust
//! use aura_core::{TelemetryError, Validator, WorkerReading, WorkerValidator};
//!
//! let reading = WorkerReading { heart_rate: 250, ..WorkerReading::default() };
//! match WorkerValidator::default().validate(&reading) {
//!     Err(TelemetryError::OutOfRange { field, .. }) => assert_eq!(field, "heart_rate"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use alloc::string::String;
use thiserror_no_std::Error;

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Kind of entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Site worker wearing a vitals sensor
    Worker,
    /// Instrumented machine
    Machine,
}

impl EntityKind {
    /// Lowercase label used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Machine => "machine",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced at the boundary of the scoring engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    /// Field outside its declared bounds
    #[error("{field} = {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// Payload field name
        field: &'static str,
        /// Supplied value
        value: f64,
        /// Lowest accepted value
        min: f64,
        /// Highest accepted value
        max: f64,
    },

    /// Float field is NaN or infinite
    #[error("{field} is not a finite number")]
    InvalidValue {
        /// Payload field name
        field: &'static str,
    },

    /// Entity was never registered
    #[error("{kind} {id} not found")]
    NotFound {
        /// Worker or machine
        kind: EntityKind,
        /// External identifier, e.g. `WK-7822`
        id: String,
    },

    /// Entity is already registered
    #[error("{kind} {id} already exists")]
    AlreadyExists {
        /// Worker or machine
        kind: EntityKind,
        /// External identifier
        id: String,
    },

    /// Machine type string matched no profile
    #[error("unknown machine type: {0}")]
    UnknownMachineType(String),
}

impl TelemetryError {
    /// Shorthand for a not-found error
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    /// Shorthand for a duplicate registration error
    pub fn already_exists(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::AlreadyExists { kind, id: id.into() }
    }

    /// True for errors caused by a malformed payload
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::InvalidValue { .. })
    }
}
