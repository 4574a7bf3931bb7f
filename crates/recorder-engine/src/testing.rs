//! Test fixtures: a sample record type and store wrappers that inject
//! interleavings and faults.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use recorder_core::{Edge, EdgeKind, NewNode, Node, Record, ValidationError};
use recorder_store::{EdgeSwap, GraphStore, MemoryGraph, StoreError, StoreResult, SwapOutcome};
use serde::{Deserialize, Serialize};
use tokio::sync::Barrier;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub hair_color: Option<String>,
}

impl Person {
    pub fn new(name: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            age,
            hair_color: None,
        }
    }
}

impl Record for Person {
    const LABEL: &'static str = "Person";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "must not be empty"));
        }
        Ok(())
    }
}

/// Second record type, to check that entity kinds do not leak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub total: i64,
}

impl Record for Invoice {
    const LABEL: &'static str = "Invoice";
}

/// Holds ACTIVE_RECORD reads at a barrier once armed, so concurrent
/// mutations all observe the same active record before any of them swaps.
#[derive(Clone)]
pub struct GatedGraph {
    pub inner: MemoryGraph,
    barrier: Arc<Barrier>,
    remaining: Arc<AtomicUsize>,
}

impl GatedGraph {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: MemoryGraph::new(),
            barrier: Arc::new(Barrier::new(parties)),
            remaining: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Gate the next `reads` ACTIVE_RECORD lookups.
    pub fn arm(&self, reads: usize) {
        self.remaining.store(reads, Ordering::SeqCst);
    }
}

#[async_trait]
impl GraphStore for GatedGraph {
    async fn insert_node(&self, node: NewNode) -> StoreResult<Node> {
        self.inner.insert_node(node).await
    }

    async fn get_node(&self, id: Uuid) -> StoreResult<Option<Node>> {
        self.inner.get_node(id).await
    }

    async fn insert_edge(&self, edge: Edge) -> StoreResult<Edge> {
        self.inner.insert_edge(edge).await
    }

    async fn swap_edge(&self, swap: EdgeSwap) -> StoreResult<SwapOutcome> {
        self.inner.swap_edge(swap).await
    }

    async fn edges_from(&self, kind: EdgeKind, start: Uuid) -> StoreResult<Vec<Edge>> {
        let edges = self.inner.edges_from(kind, start).await?;
        if kind == EdgeKind::ActiveRecord
            && self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            self.barrier.wait().await;
        }
        Ok(edges)
    }

    async fn edges_to(&self, kind: EdgeKind, end: Uuid) -> StoreResult<Vec<Edge>> {
        self.inner.edges_to(kind, end).await
    }

    async fn find_edge(&self, kind: EdgeKind, start: Uuid, end: Uuid) -> StoreResult<Option<Edge>> {
        self.inner.find_edge(kind, start, end).await
    }
}

/// Fails or stalls edge inserts of one kind, simulating a crash or a slow
/// store between steps.
#[derive(Clone, Default)]
pub struct FaultyGraph {
    pub inner: MemoryGraph,
    failing: Arc<Mutex<Option<EdgeKind>>>,
    delayed: Arc<Mutex<Option<(EdgeKind, Duration)>>>,
}

impl FaultyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_inserts(&self, kind: Option<EdgeKind>) {
        *self.failing.lock().unwrap() = kind;
    }

    pub fn delay_inserts(&self, delay: Option<(EdgeKind, Duration)>) {
        *self.delayed.lock().unwrap() = delay;
    }
}

#[async_trait]
impl GraphStore for FaultyGraph {
    async fn insert_node(&self, node: NewNode) -> StoreResult<Node> {
        self.inner.insert_node(node).await
    }

    async fn get_node(&self, id: Uuid) -> StoreResult<Option<Node>> {
        self.inner.get_node(id).await
    }

    async fn insert_edge(&self, edge: Edge) -> StoreResult<Edge> {
        let delay = *self.delayed.lock().unwrap();
        if let Some((kind, pause)) = delay
            && kind == edge.kind
        {
            tokio::time::sleep(pause).await;
        }
        if *self.failing.lock().unwrap() == Some(edge.kind) {
            return Err(StoreError::GraphError(format!("injected {} failure", edge.kind)));
        }
        self.inner.insert_edge(edge).await
    }

    async fn swap_edge(&self, swap: EdgeSwap) -> StoreResult<SwapOutcome> {
        self.inner.swap_edge(swap).await
    }

    async fn edges_from(&self, kind: EdgeKind, start: Uuid) -> StoreResult<Vec<Edge>> {
        self.inner.edges_from(kind, start).await
    }

    async fn edges_to(&self, kind: EdgeKind, end: Uuid) -> StoreResult<Vec<Edge>> {
        self.inner.edges_to(kind, end).await
    }

    async fn find_edge(&self, kind: EdgeKind, start: Uuid, end: Uuid) -> StoreResult<Option<Edge>> {
        self.inner.find_edge(kind, start, end).await
    }
}
