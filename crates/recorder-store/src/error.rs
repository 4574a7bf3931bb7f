//! Error types for the storage layer.

use recorder_core::EdgeKind;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
///
/// Absence is not an error at the store boundary: lookups return
/// `Ok(None)` and only the repositories decide when a missing node matters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// A node required by the operation does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(Uuid),

    /// Node exists with a different kind or label than expected.
    #[error("node {id} is a {found}, expected {expected}")]
    KindMismatch {
        id: Uuid,
        expected: String,
        found: String,
    },

    /// Inserting the edge would break a degree constraint of its kind.
    #[error("{kind} edge {start} -> {end} conflicts with an existing edge")]
    EdgeConflict { kind: EdgeKind, start: Uuid, end: Uuid },

    /// `create` was called for a singleton edge that already exists.
    #[error("{kind} edge from {start} already exists")]
    SingletonExists { kind: EdgeKind, start: Uuid },

    /// The operation is not defined for the edge kind's multiplicity.
    #[error("{operation} is not supported for {kind} edges")]
    InvalidEdgeKind {
        kind: EdgeKind,
        operation: &'static str,
    },

    /// A node with this id was already written; nodes are never rewritten.
    #[error("node {0} already exists and cannot be rewritten")]
    ImmutableNode(Uuid),

    /// Graph row could not be interpreted.
    #[error("graph operation failed: {0}")]
    GraphError(String),

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
