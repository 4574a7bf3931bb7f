//! recorder-engine: immutable audit trails for graph-stored entities
//!
//! This crate provides:
//! - `VersioningEngine`, the create/read/update/delete entry point
//! - History reconstruction and point-in-time reads
//! - Integrity checks and additive repair of partially applied mutations
//!
//! # Usage
//!
//! ```rust,ignore
//! use recorder_engine::{EngineConfig, VersioningEngine};
//! use recorder_store::MemoryGraph;
//!
//! let engine: VersioningEngine<_, Person> =
//!     VersioningEngine::new(MemoryGraph::new(), EngineConfig::default());
//!
//! let alice = engine.create(Person { name: "Alice".into(), age: 30 }).await?;
//! engine.update(alice.id, json!({ "age": 31 })).await?;
//! engine.delete(alice.id).await?;
//!
//! assert_eq!(engine.history(alice.id).await?.len(), 3);
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use audit::{IntegrityIssue, IntegrityReport, RepairAction};
pub use config::EngineConfig;
pub use engine::VersioningEngine;
pub use error::{EngineError, EngineResult};
pub use view::EntityView;
