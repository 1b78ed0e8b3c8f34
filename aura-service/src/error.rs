use aura_core::{EntityKind, TelemetryError};
use aura_schemas::SchemaError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation failure, unknown or duplicate entity
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// Archive encoding failure
    #[error("archive error: {0}")]
    Schema(#[from] SchemaError),

    /// Backing store failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::Telemetry(TelemetryError::not_found(kind, id))
    }

    pub fn already_exists(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::Telemetry(TelemetryError::already_exists(kind, id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Telemetry(TelemetryError::NotFound { .. }))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Telemetry(TelemetryError::AlreadyExists { .. }))
    }

    /// True for errors caused by a malformed payload
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Telemetry(e) if e.is_validation())
    }
}
