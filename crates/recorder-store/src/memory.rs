//! In-memory graph store.
//!
//! `MemoryGraph` keeps every node and edge behind one `Arc<RwLock<>>`, so
//! each trait method is atomic with respect to all others and clones share
//! the same graph. It backs the engine tests and the CLI demo, and serves
//! as the reference for the semantics `PgGraph` reproduces in SQL.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use recorder_core::{Edge, EdgeKind, NewNode, Node};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::graph::{EdgeSwap, GraphStore, SwapOutcome};

#[derive(Debug, Default)]
struct GraphState {
    nodes: HashMap<Uuid, Node>,
    /// Insertion order doubles as creation order.
    edges: Vec<Edge>,
}

impl GraphState {
    fn conflicting_edge(&self, edge: &Edge) -> bool {
        self.edges.iter().any(|e| {
            e.kind == edge.kind
                && ((edge.kind.exclusive_start() && e.start == edge.start)
                    || (edge.kind.exclusive_end() && e.end == edge.end))
        })
    }
}

/// Thread-safe, process-local graph store.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    state: Arc<RwLock<GraphState>>,
}

impl MemoryGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes.
    pub fn node_count(&self) -> usize {
        self.state.read().map(|s| s.nodes.len()).unwrap_or(0)
    }

    /// Number of stored edges of `kind`.
    pub fn edge_count(&self, kind: EdgeKind) -> usize {
        self.state
            .read()
            .map(|s| s.edges.iter().filter(|e| e.kind == kind).count())
            .unwrap_or(0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, GraphState>> {
        self.state
            .read()
            .map_err(|_| StoreError::GraphError("memory graph lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, GraphState>> {
        self.state
            .write()
            .map_err(|_| StoreError::GraphError("memory graph lock poisoned".to_string()))
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn insert_node(&self, node: NewNode) -> StoreResult<Node> {
        let mut state = self.write()?;
        if state.nodes.contains_key(&node.id) {
            return Err(StoreError::ImmutableNode(node.id));
        }
        let node = node.into_node();
        state.nodes.insert(node.id, node.clone());
        Ok(node)
    }

    async fn get_node(&self, id: Uuid) -> StoreResult<Option<Node>> {
        Ok(self.read()?.nodes.get(&id).cloned())
    }

    async fn insert_edge(&self, edge: Edge) -> StoreResult<Edge> {
        let mut state = self.write()?;
        for endpoint in [edge.start, edge.end] {
            if !state.nodes.contains_key(&endpoint) {
                return Err(StoreError::NodeNotFound(endpoint));
            }
        }
        if state.conflicting_edge(&edge) {
            return Err(StoreError::EdgeConflict {
                kind: edge.kind,
                start: edge.start,
                end: edge.end,
            });
        }
        state.edges.push(edge);
        Ok(edge)
    }

    async fn swap_edge(&self, swap: EdgeSwap) -> StoreResult<SwapOutcome> {
        let kind = swap.edge.kind;
        if !kind.exclusive_start() {
            return Err(StoreError::InvalidEdgeKind {
                kind,
                operation: "swap",
            });
        }

        let mut state = self.write()?;
        if !state.nodes.contains_key(&swap.edge.end) {
            return Err(StoreError::NodeNotFound(swap.edge.end));
        }

        let Some(slot) = state
            .edges
            .iter()
            .position(|e| e.kind == kind && e.start == swap.edge.start)
        else {
            return Ok(SwapOutcome::Missing);
        };

        let previous = state.edges[slot];
        if let Some(expected) = swap.expected_end
            && previous.end != expected
        {
            return Ok(SwapOutcome::Stale { current: previous });
        }

        if kind.exclusive_end()
            && state
                .edges
                .iter()
                .any(|e| e.kind == kind && e.end == swap.edge.end && e.id != previous.id)
        {
            return Err(StoreError::EdgeConflict {
                kind,
                start: swap.edge.start,
                end: swap.edge.end,
            });
        }

        state.edges[slot] = swap.edge;
        Ok(SwapOutcome::Swapped {
            previous,
            current: swap.edge,
        })
    }

    async fn edges_from(&self, kind: EdgeKind, start: Uuid) -> StoreResult<Vec<Edge>> {
        Ok(self
            .read()?
            .edges
            .iter()
            .filter(|e| e.kind == kind && e.start == start)
            .copied()
            .collect())
    }

    async fn edges_to(&self, kind: EdgeKind, end: Uuid) -> StoreResult<Vec<Edge>> {
        Ok(self
            .read()?
            .edges
            .iter()
            .filter(|e| e.kind == kind && e.end == end)
            .copied()
            .collect())
    }

    async fn find_edge(
        &self,
        kind: EdgeKind,
        start: Uuid,
        end: Uuid,
    ) -> StoreResult<Option<Edge>> {
        Ok(self
            .read()?
            .edges
            .iter()
            .find(|e| e.kind == kind && e.start == start && e.end == end)
            .copied())
    }
}
