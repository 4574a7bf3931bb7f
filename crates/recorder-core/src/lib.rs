//! recorder-core: data model of the recorder versioning graph.
//!
//! This crate provides:
//! - Identifier newtypes for entities, records, and edges
//! - The fixed node and edge kinds with their multiplicity policies
//! - Version records and their persisted property layout
//! - The schema contract (`Record`) that typed payloads implement

pub mod schema;
pub mod types;

pub use schema::{Record, ValidationError, merge_fields, to_field_set, validate_fields};
pub use types::*;
