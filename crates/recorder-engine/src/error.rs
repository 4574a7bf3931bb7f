//! Error types for the versioning engine.

use std::time::Duration;

use recorder_core::{EntityId, RecordId, ValidationError};
use recorder_store::StoreError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Caller-visible failures of the versioning engine.
///
/// Every mutating call either fully succeeds or returns exactly one of
/// these; there is no partial success.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The entity does not exist (or belongs to another entity kind).
    #[error("entity not found: {0}")]
    NotFound(EntityId),

    /// The record does not exist or is not part of the entity's history.
    #[error("record {record} not found in history of entity {entity}")]
    RecordNotFound { entity: EntityId, record: RecordId },

    /// The payload was rejected before any write.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The entity's graph is missing structure a prior mutation should
    /// have written. See `audit::verify` and `audit::repair`.
    #[error("entity {entity} is inconsistent: {reason}")]
    Consistency { entity: EntityId, reason: String },

    /// Another mutation repointed the active record first.
    #[error("concurrent modification of entity {entity}: expected active record {expected}, found {actual}")]
    ConcurrencyConflict {
        entity: EntityId,
        expected: RecordId,
        actual: RecordId,
    },

    /// The entity is deleted; it can be read but not mutated.
    #[error("entity {0} is deleted")]
    Tombstoned(EntityId),

    /// The operation did not finish within the configured deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Underlying storage failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    pub(crate) fn consistency(entity: EntityId, reason: impl Into<String>) -> Self {
        Self::Consistency {
            entity,
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call from scratch can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }

    /// Short machine-readable code, used for CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Consistency { .. } => "CONSISTENCY_ERROR",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            Self::Tombstoned(_) => "TOMBSTONED",
            Self::Timeout(_) => "TIMEOUT",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
