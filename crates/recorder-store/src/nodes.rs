//! Entity and record repository.
//!
//! This module wraps the raw `GraphStore` node operations with the
//! versioning domain types. It handles:
//!
//! - Conversion between stored nodes and `EntityNode` / `VersionRecord`
//! - Kind and label checks on every read
//! - Node creation only; there is no update or delete, which is what
//!   keeps version records immutable

use recorder_core::{
    EntityId, EntityNode, FieldSet, NewNode, Node, NodeKind, Operation, RecordId,
    RecordProperties, VersionRecord,
};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::graph::GraphStore;

/// Node persistence for entities and their version records.
#[derive(Debug, Clone)]
pub struct NodeRepository<S> {
    store: S,
}

impl<S: GraphStore> NodeRepository<S> {
    /// Create a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Generic Node Operations
    // ========================================================================

    /// Persist a new node of `kind` with the supplied properties.
    pub async fn create_node(
        &self,
        kind: NodeKind,
        label: &str,
        properties: FieldSet,
    ) -> StoreResult<Node> {
        self.store
            .insert_node(NewNode::new(kind, label, properties))
            .await
    }

    /// Fetch a node of `kind`.
    ///
    /// Fails with `NodeNotFound` when absent and `KindMismatch` when the id
    /// belongs to a node of another kind.
    pub async fn get_node(&self, kind: NodeKind, id: Uuid) -> StoreResult<Node> {
        let node = self
            .store
            .get_node(id)
            .await?
            .ok_or(StoreError::NodeNotFound(id))?;

        if node.kind != kind {
            return Err(StoreError::KindMismatch {
                id,
                expected: kind.to_string(),
                found: node.kind.to_string(),
            });
        }
        Ok(node)
    }

    // ========================================================================
    // Entity Operations
    // ========================================================================

    /// Create an entity node. Entities carry identity only.
    pub async fn create_entity(&self, label: &str) -> StoreResult<EntityNode> {
        let node = self
            .create_node(NodeKind::Entity, label, FieldSet::new())
            .await?;
        Ok(entity_from_node(node))
    }

    /// Look up an entity of the given label.
    ///
    /// Returns `None` if no such node exists, or if the id belongs to a
    /// record or to an entity of another label.
    pub async fn find_entity(&self, id: EntityId, label: &str) -> StoreResult<Option<EntityNode>> {
        Ok(self
            .store
            .get_node(id.0)
            .await?
            .filter(|node| node.kind == NodeKind::Entity && node.label == label)
            .map(entity_from_node))
    }

    // ========================================================================
    // Record Operations
    // ========================================================================

    /// Create an immutable version record.
    pub async fn create_record(
        &self,
        label: &str,
        operation: Operation,
        previous: Option<RecordId>,
        fields: FieldSet,
    ) -> StoreResult<VersionRecord> {
        let properties = RecordProperties {
            operation,
            previous,
            fields,
        };
        let properties = match serde_json::to_value(&properties)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(StoreError::GraphError(format!(
                    "record properties serialized to {}",
                    other
                )));
            }
        };

        let node = self.create_node(NodeKind::Record, label, properties).await?;
        record_from_node(node)
    }

    /// Get a version record by id.
    pub async fn get_record(&self, id: RecordId) -> StoreResult<VersionRecord> {
        let node = self.get_node(NodeKind::Record, id.0).await?;
        record_from_node(node)
    }
}

fn entity_from_node(node: Node) -> EntityNode {
    EntityNode {
        id: EntityId::from_uuid(node.id),
        label: node.label,
        created_at: node.created_at,
    }
}

fn record_from_node(node: Node) -> StoreResult<VersionRecord> {
    let properties: RecordProperties =
        serde_json::from_value(serde_json::Value::Object(node.properties))?;

    Ok(VersionRecord {
        id: RecordId::from_uuid(node.id),
        created_at: node.created_at,
        operation: properties.operation,
        previous: properties.previous,
        fields: properties.fields,
    })
}
