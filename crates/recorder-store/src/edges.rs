//! Edge repository.
//!
//! Multiplicity policy lives here rather than in the engine:
//!
//! - `Multiplicity::Append` kinds (HAS_RECORD, PRECEDES) are only ever
//!   created
//! - `Multiplicity::Singleton` kinds (ACTIVE_RECORD) are created once and
//!   then repointed with `replace`
//!
//! Creating a singleton twice is rejected with `SingletonExists`, so a
//! caller bug is caught structurally. Unresolvable endpoints are reported
//! as `Ok(None)`: a precondition the caller decides how to treat.

use recorder_core::{Edge, EdgeKind, Multiplicity};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::graph::{EdgeSwap, GraphStore, SwapOutcome};

/// Typed edge persistence over a graph store.
#[derive(Debug, Clone)]
pub struct EdgeRepository<S> {
    store: S,
}

impl<S: GraphStore> EdgeRepository<S> {
    /// Create a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check that both endpoints exist with the kinds `kind` connects.
    ///
    /// Returns `false` if either is missing.
    async fn resolve(&self, kind: EdgeKind, start: Uuid, end: Uuid) -> StoreResult<bool> {
        let (start_kind, end_kind) = kind.endpoints();
        for (id, expected) in [(start, start_kind), (end, end_kind)] {
            let Some(node) = self.store.get_node(id).await? else {
                return Ok(false);
            };
            if node.kind != expected {
                return Err(StoreError::KindMismatch {
                    id,
                    expected: expected.to_string(),
                    found: node.kind.to_string(),
                });
            }
        }
        Ok(true)
    }

    /// Create an edge of `kind` from `start` to `end`.
    ///
    /// Append kinds always insert. Singleton kinds insert only if no edge
    /// of that kind leaves `start` yet; otherwise `SingletonExists`.
    pub async fn create(&self, kind: EdgeKind, start: Uuid, end: Uuid) -> StoreResult<Option<Edge>> {
        if !self.resolve(kind, start, end).await? {
            tracing::debug!(%kind, %start, %end, "edge endpoint not found");
            return Ok(None);
        }

        if kind.multiplicity() == Multiplicity::Singleton
            && !self.store.edges_from(kind, start).await?.is_empty()
        {
            return Err(StoreError::SingletonExists { kind, start });
        }

        let edge = self.store.insert_edge(Edge::new(kind, start, end)).await?;
        tracing::debug!(%kind, %start, %end, edge_id = %edge.id, "edge created");
        Ok(Some(edge))
    }

    /// Repoint the singleton edge of `kind` leaving `start` to `new_end`.
    ///
    /// With `expected_end` set this is a compare-and-swap: the edge is only
    /// repointed if it still targets `expected_end`. The prior edge is
    /// overwritten; its history lives in the record chain, not here.
    ///
    /// Returns `None` if `start` or `new_end` does not resolve.
    pub async fn replace(
        &self,
        kind: EdgeKind,
        start: Uuid,
        new_end: Uuid,
        expected_end: Option<Uuid>,
    ) -> StoreResult<Option<SwapOutcome>> {
        if kind.multiplicity() != Multiplicity::Singleton {
            return Err(StoreError::InvalidEdgeKind {
                kind,
                operation: "replace",
            });
        }
        if !self.resolve(kind, start, new_end).await? {
            return Ok(None);
        }

        let outcome = self
            .store
            .swap_edge(EdgeSwap {
                edge: Edge::new(kind, start, new_end),
                expected_end,
            })
            .await?;

        match &outcome {
            SwapOutcome::Swapped { previous, current } => {
                tracing::debug!(%kind, %start, from = %previous.end, to = %current.end, "edge replaced");
            }
            SwapOutcome::Stale { current } => {
                tracing::debug!(%kind, %start, current = %current.end, "edge replace lost compare-and-swap");
            }
            SwapOutcome::Missing => {
                tracing::debug!(%kind, %start, "no edge to replace");
            }
        }
        Ok(Some(outcome))
    }

    /// The unique edge of `kind` leaving `start`.
    ///
    /// Only defined for kinds with an exclusive start; use [`list`] for
    /// HAS_RECORD.
    ///
    /// [`list`]: Self::list
    pub async fn read(&self, kind: EdgeKind, start: Uuid) -> StoreResult<Option<Edge>> {
        if !kind.exclusive_start() {
            return Err(StoreError::InvalidEdgeKind {
                kind,
                operation: "read",
            });
        }
        let mut edges = self.store.edges_from(kind, start).await?;
        if edges.len() > 1 {
            return Err(StoreError::GraphError(format!(
                "{} edges of kind {} leave {}",
                edges.len(),
                kind,
                start
            )));
        }
        Ok(edges.pop())
    }

    /// The unique edge of `kind` entering `end`.
    ///
    /// Only defined for kinds with an exclusive end.
    pub async fn read_incoming(&self, kind: EdgeKind, end: Uuid) -> StoreResult<Option<Edge>> {
        if !kind.exclusive_end() {
            return Err(StoreError::InvalidEdgeKind {
                kind,
                operation: "read_incoming",
            });
        }
        let mut edges = self.store.edges_to(kind, end).await?;
        if edges.len() > 1 {
            return Err(StoreError::GraphError(format!(
                "{} edges of kind {} enter {}",
                edges.len(),
                kind,
                end
            )));
        }
        Ok(edges.pop())
    }

    /// All edges of `kind` leaving `start`, oldest first.
    pub async fn list(&self, kind: EdgeKind, start: Uuid) -> StoreResult<Vec<Edge>> {
        self.store.edges_from(kind, start).await
    }

    /// Point lookup of the `kind` edge between two nodes.
    pub async fn find_between(
        &self,
        start: Uuid,
        end: Uuid,
        kind: EdgeKind,
    ) -> StoreResult<Option<Edge>> {
        self.store.find_edge(kind, start, end).await
    }
}
