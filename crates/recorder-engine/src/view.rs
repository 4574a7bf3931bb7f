//! Read views returned by the engine.

use chrono::{DateTime, Utc};
use recorder_core::{EntityId, EntityNode, EntityState, Operation, RecordId, VersionRecord};
use serde::{Deserialize, Serialize};

/// An entity's identity projected together with one of its snapshots.
///
/// `fields` are the business fields of the record; `state` is derived from
/// the record's operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView<T> {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
    pub record_id: RecordId,
    pub operation: Operation,
    pub state: EntityState,
    /// When the projected record was written.
    pub recorded_at: DateTime<Utc>,
    pub fields: T,
}

impl<T> EntityView<T> {
    pub(crate) fn new(entity: &EntityNode, record: VersionRecord<T>) -> Self {
        Self {
            id: entity.id,
            created_at: entity.created_at,
            record_id: record.id,
            operation: record.operation,
            state: record.operation.state(),
            recorded_at: record.created_at,
            fields: record.fields,
        }
    }

    pub fn is_tombstoned(&self) -> bool {
        self.state == EntityState::Tombstoned
    }
}
