//! recorder-store: Graph storage for the recorder versioning engine
//!
//! This crate provides:
//! - The `GraphStore` trait: nodes plus directed, typed edges
//! - `MemoryGraph`, an in-process store for tests and demos
//! - `PgGraph`, a PostgreSQL store with topology enforced by the schema
//! - Repositories that map graph nodes and edges to versioning types
//!
//! # Architecture
//!
//! Two node kinds live in the graph:
//! - Entity nodes, carrying identity only
//! - Record nodes, immutable snapshots of an entity's fields
//!
//! and three edge kinds connect them: `HAS_RECORD` (entity to every
//! record), `ACTIVE_RECORD` (entity to its current record) and `PRECEDES`
//! (record to its successor).
//!
//! # Usage
//!
//! ```rust,ignore
//! use recorder_store::{EdgeRepository, NodeRepository, PgGraph, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let graph = PgGraph::connect(config).await?;
//!
//! let nodes = NodeRepository::new(graph.clone());
//! let entity = nodes.create_entity("Person").await?;
//! ```

pub mod edges;
pub mod error;
pub mod graph;
pub mod memory;
pub mod models;
pub mod nodes;
pub mod schema;
pub mod store;

pub use edges::EdgeRepository;
pub use error::{StoreError, StoreResult};
pub use graph::{EdgeSwap, GraphStore, SwapOutcome};
pub use memory::MemoryGraph;
pub use nodes::NodeRepository;
pub use schema::{is_schema_initialized, run_migrations};
pub use store::{PgGraph, StoreConfig};

// Re-export recorder-core for downstream crates
pub use recorder_core;
