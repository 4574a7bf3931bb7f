//! Database models for the storage layer.
//!
//! These types map directly to rows of `graph_nodes` and `graph_edges` and
//! are used for sqlx queries. They are separate from the graph types in
//! recorder-core so that kind columns can be validated on the way out.

use chrono::{DateTime, Utc};
use recorder_core::{Edge, EdgeId, FieldSet, Node};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::StoreError;

/// Database row for the `graph_nodes` table.
#[derive(Debug, Clone, FromRow)]
pub struct NodeRow {
    pub id: Uuid,
    pub kind: String,
    pub label: String,
    pub properties: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NodeRow> for Node {
    type Error = StoreError;

    fn try_from(row: NodeRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|e| StoreError::GraphError(format!("node {}: {}", row.id, e)))?;
        let properties: FieldSet = serde_json::from_value(row.properties)?;

        Ok(Node {
            id: row.id,
            kind,
            label: row.label,
            properties,
            created_at: row.created_at,
        })
    }
}

/// Database row for the `graph_edges` table.
#[derive(Debug, Clone, FromRow)]
pub struct EdgeRow {
    pub id: Uuid,
    pub kind: String,
    pub start_id: Uuid,
    pub end_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EdgeRow> for Edge {
    type Error = StoreError;

    fn try_from(row: EdgeRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|e| StoreError::GraphError(format!("edge {}: {}", row.id, e)))?;

        Ok(Edge {
            id: EdgeId::from_uuid(row.id),
            kind,
            start: row.start_id,
            end: row.end_id,
            created_at: row.created_at,
        })
    }
}

/// Convert a batch of rows, failing on the first malformed one.
pub(crate) fn edges_from_rows(rows: Vec<EdgeRow>) -> Result<Vec<Edge>, StoreError> {
    rows.into_iter().map(Edge::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recorder_core::{EdgeKind, NodeKind};

    #[test]
    fn test_node_row_conversion() {
        let row = NodeRow {
            id: Uuid::new_v4(),
            kind: "record".to_string(),
            label: "PersonRecord".to_string(),
            properties: serde_json::json!({"operation": "created"}),
            created_at: Utc::now(),
        };
        let node = Node::try_from(row).unwrap();
        assert_eq!(node.kind, NodeKind::Record);
        assert_eq!(node.properties["operation"], "created");
    }

    #[test]
    fn test_edge_row_rejects_unknown_kind() {
        let row = EdgeRow {
            id: Uuid::new_v4(),
            kind: "HAS_PREVIOUS_RECORD".to_string(),
            start_id: Uuid::new_v4(),
            end_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert!(matches!(Edge::try_from(row), Err(StoreError::GraphError(_))));
    }

    #[test]
    fn test_edge_row_conversion() {
        let row = EdgeRow {
            id: Uuid::new_v4(),
            kind: "ACTIVE_RECORD".to_string(),
            start_id: Uuid::new_v4(),
            end_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let edge = Edge::try_from(row.clone()).unwrap();
        assert_eq!(edge.kind, EdgeKind::ActiveRecord);
        assert_eq!(edge.start, row.start_id);
        assert_eq!(edge.id.0, row.id);
    }
}
