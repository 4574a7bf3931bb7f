//! Core data types for the recorder graph.
//!
//! An entity is a node with stable identity and no business fields of its
//! own. Every state an entity has ever been in lives in an immutable
//! version record, and three edge kinds tie the two together:
//!
//! - `HAS_RECORD` (entity -> record): full history membership, append-only
//! - `ACTIVE_RECORD` (entity -> record): the current record, replaceable
//! - `PRECEDES` (record -> record): the creation-ordered record chain
//!
//! All types derive `Debug`, `Clone`, `Serialize`, and `Deserialize` for
//! inspection, copying, and JSON serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// An ordered set of business fields, copied verbatim between snapshots.
pub type FieldSet = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// ID Types
// ============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random identifier using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Stable identity of a logical entity.
    EntityId
);

uuid_id!(
    /// Identity of one immutable version record.
    RecordId
);

uuid_id!(
    /// Identity of a single edge instance.
    EdgeId
);

// ============================================================================
// Operations and State
// ============================================================================

/// The mutation that produced a version record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Created,
    Updated,
    Deleted,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    /// Logical state of an entity whose active record carries this operation.
    pub const fn state(&self) -> EntityState {
        match self {
            Self::Created | Self::Updated => EntityState::Active,
            Self::Deleted => EntityState::Tombstoned,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            other => Err(ParseKindError::Operation(other.to_string())),
        }
    }
}

/// Logical state of an entity, derived from its active record.
///
/// `Tombstoned` is terminal: reads keep working, mutations are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    Active,
    Tombstoned,
}

impl EntityState {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

// ============================================================================
// Graph Kinds
// ============================================================================

/// The two node kinds stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Entity,
    Record,
}

impl NodeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entity" => Ok(Self::Entity),
            "record" => Ok(Self::Record),
            other => Err(ParseKindError::Node(other.to_string())),
        }
    }
}

/// How instances of an edge kind may change over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    /// Instances are only ever added, never replaced or removed.
    Append,
    /// At most one instance per start node, repointed in place.
    Singleton,
}

/// The fixed edge topology of the versioning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    HasRecord,
    ActiveRecord,
    Precedes,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] = [Self::HasRecord, Self::ActiveRecord, Self::Precedes];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HasRecord => "HAS_RECORD",
            Self::ActiveRecord => "ACTIVE_RECORD",
            Self::Precedes => "PRECEDES",
        }
    }

    pub const fn multiplicity(&self) -> Multiplicity {
        match self {
            Self::HasRecord | Self::Precedes => Multiplicity::Append,
            Self::ActiveRecord => Multiplicity::Singleton,
        }
    }

    /// Node kinds of the start and end endpoints.
    pub const fn endpoints(&self) -> (NodeKind, NodeKind) {
        match self {
            Self::HasRecord | Self::ActiveRecord => (NodeKind::Entity, NodeKind::Record),
            Self::Precedes => (NodeKind::Record, NodeKind::Record),
        }
    }

    /// At most one edge of this kind may leave a given node.
    pub const fn exclusive_start(&self) -> bool {
        matches!(self, Self::ActiveRecord | Self::Precedes)
    }

    /// At most one edge of this kind may enter a given node.
    pub const fn exclusive_end(&self) -> bool {
        matches!(self, Self::Precedes)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HAS_RECORD" => Ok(Self::HasRecord),
            "ACTIVE_RECORD" => Ok(Self::ActiveRecord),
            "PRECEDES" => Ok(Self::Precedes),
            other => Err(ParseKindError::Edge(other.to_string())),
        }
    }
}

/// Error type for parsing kinds and operations from their stored names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKindError {
    #[error("unknown node kind: {0}")]
    Node(String),
    #[error("unknown edge kind: {0}")]
    Edge(String),
    #[error("unknown operation: {0}")]
    Operation(String),
}

// ============================================================================
// Graph Elements
// ============================================================================

/// A node as persisted by a graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub kind: NodeKind,
    /// Entity type label, e.g. `Person` or `PersonRecord`.
    pub label: String,
    pub properties: FieldSet,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a node. The id and timestamp are assigned up front
/// so that every store persists exactly what the caller built.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub id: Uuid,
    pub kind: NodeKind,
    pub label: String,
    pub properties: FieldSet,
    pub created_at: DateTime<Utc>,
}

impl NewNode {
    pub fn new(kind: NodeKind, label: impl Into<String>, properties: FieldSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            properties,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// The node this input produces once stored.
    pub fn into_node(self) -> Node {
        Node {
            id: self.id,
            kind: self.kind,
            label: self.label,
            properties: self.properties,
            created_at: self.created_at,
        }
    }
}

/// A directed, typed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub kind: EdgeKind,
    pub start: Uuid,
    pub end: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Edge {
    /// A fresh edge of `kind` between two nodes, stamped now.
    pub fn new(kind: EdgeKind, start: Uuid, end: Uuid) -> Self {
        Self {
            id: EdgeId::new(),
            kind,
            start,
            end,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Versioning Domain Types
// ============================================================================

/// An entity node: identity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    pub id: EntityId,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted property layout of a version record node.
///
/// Business fields are nested so that they never collide with the
/// bookkeeping keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordProperties {
    pub operation: Operation,
    /// The record this one succeeds; `None` only for the CREATED record.
    pub previous: Option<RecordId>,
    pub fields: FieldSet,
}

/// An immutable snapshot of an entity's business fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord<F = FieldSet> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub operation: Operation,
    pub previous: Option<RecordId>,
    pub fields: F,
}

impl<F> VersionRecord<F> {
    /// Convert the field payload, keeping the record metadata.
    pub fn map_fields<G, E>(self, f: impl FnOnce(F) -> Result<G, E>) -> Result<VersionRecord<G>, E> {
        Ok(VersionRecord {
            id: self.id,
            created_at: self.created_at,
            operation: self.operation,
            previous: self.previous,
            fields: f(self.fields)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_policies() {
        assert_eq!(EdgeKind::HasRecord.multiplicity(), Multiplicity::Append);
        assert_eq!(EdgeKind::Precedes.multiplicity(), Multiplicity::Append);
        assert_eq!(EdgeKind::ActiveRecord.multiplicity(), Multiplicity::Singleton);

        assert!(!EdgeKind::HasRecord.exclusive_start());
        assert!(EdgeKind::ActiveRecord.exclusive_start());
        assert!(EdgeKind::Precedes.exclusive_start());
        assert!(EdgeKind::Precedes.exclusive_end());
        assert!(!EdgeKind::ActiveRecord.exclusive_end());
    }

    #[test]
    fn test_edge_kind_names() {
        for kind in EdgeKind::ALL {
            assert_eq!(kind.as_str().parse::<EdgeKind>().unwrap(), kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().to_string())
            );
        }
        assert!("HAS_PREVIOUS_RECORD".parse::<EdgeKind>().is_err());
    }

    #[test]
    fn test_operation_state() {
        assert_eq!(Operation::Created.state(), EntityState::Active);
        assert_eq!(Operation::Updated.state(), EntityState::Active);
        assert_eq!(Operation::Deleted.state(), EntityState::Tombstoned);
        assert_eq!("deleted".parse::<Operation>().unwrap(), Operation::Deleted);
        assert_eq!(serde_json::to_string(&Operation::Updated).unwrap(), "\"updated\"");
    }

    #[test]
    fn test_record_properties_nest_fields() {
        let mut fields = FieldSet::new();
        fields.insert("operation".into(), serde_json::json!("user data"));

        let props = RecordProperties {
            operation: Operation::Created,
            previous: None,
            fields,
        };
        let value = serde_json::to_value(&props).unwrap();

        assert_eq!(value["operation"], "created");
        assert_eq!(value["fields"]["operation"], "user data");
        assert!(value["previous"].is_null());
    }

    #[test]
    fn test_entity_id_roundtrip_display() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(Uuid::from(id), id.0);
    }
}
