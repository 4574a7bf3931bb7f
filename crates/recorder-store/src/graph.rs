//! The graph store boundary.
//!
//! A `GraphStore` is durable keyed storage of nodes and directed, typed
//! edges. It knows nothing about versioning; the repositories built on top
//! of it do. Every method is atomic on its own, and absence is reported as
//! `Ok(None)` or an empty list, never as an error.
//!
//! Stores enforce the degree constraints of each edge kind:
//! - `EdgeKind::exclusive_start` kinds allow one edge per start node
//! - `EdgeKind::exclusive_end` kinds allow one edge per end node
//!
//! A violating insert fails with [`StoreError::EdgeConflict`].
//!
//! [`StoreError::EdgeConflict`]: crate::StoreError::EdgeConflict

use async_trait::async_trait;
use recorder_core::{Edge, EdgeKind, NewNode, Node};
use uuid::Uuid;

use crate::error::StoreResult;

/// Request to repoint a start-exclusive edge in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSwap {
    /// The edge to install. Its kind and start select the edge it replaces.
    pub edge: Edge,
    /// End node the existing edge must still point at. `None` replaces
    /// whatever is there.
    pub expected_end: Option<Uuid>,
}

/// Result of an [`EdgeSwap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The edge was repointed. `previous` is gone from the store.
    Swapped { previous: Edge, current: Edge },
    /// No edge of that kind leaves the start node.
    Missing,
    /// The edge points somewhere other than `expected_end`; nothing changed.
    Stale { current: Edge },
}

/// Node and edge storage used by the repositories.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Persist a new node. Fails with `ImmutableNode` if the id is taken.
    async fn insert_node(&self, node: NewNode) -> StoreResult<Node>;

    /// Fetch a node by id.
    async fn get_node(&self, id: Uuid) -> StoreResult<Option<Node>>;

    /// Persist a new edge. Endpoints must exist.
    async fn insert_edge(&self, edge: Edge) -> StoreResult<Edge>;

    /// Compare-and-swap repoint of a start-exclusive edge.
    async fn swap_edge(&self, swap: EdgeSwap) -> StoreResult<SwapOutcome>;

    /// All edges of `kind` leaving `start`, oldest first.
    async fn edges_from(&self, kind: EdgeKind, start: Uuid) -> StoreResult<Vec<Edge>>;

    /// All edges of `kind` entering `end`, oldest first.
    async fn edges_to(&self, kind: EdgeKind, end: Uuid) -> StoreResult<Vec<Edge>>;

    /// The edge of `kind` between two specific nodes, if any.
    async fn find_edge(&self, kind: EdgeKind, start: Uuid, end: Uuid)
    -> StoreResult<Option<Edge>>;
}
