//! Schema definitions and migration utilities.
//!
//! This module provides the embedded SQL schema for the versioning graph
//! and utilities for applying it.

use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the graph tables (001_graph.sql).
pub const GRAPH_MIGRATION: &str = include_str!("../../../migrations/001_graph.sql");

/// Run all pending migrations against the database.
///
/// This function is idempotent - it can be run multiple times safely.
/// Migrations check for existing objects before creating them.
///
/// # Errors
///
/// Returns an error if any migration fails to execute.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    tracing::debug!("Running graph migration (001_graph.sql)...");
    sqlx::raw_sql(GRAPH_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::MigrationError(format!("Graph migration failed: {}", e)))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Check if the schema has been initialized.
///
/// Returns true if both graph tables exist.
pub async fn is_schema_initialized(pool: &PgPool) -> StoreResult<bool> {
    let result: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_name IN ('graph_nodes', 'graph_edges')
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(result.0 == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_migration_embedded() {
        assert!(GRAPH_MIGRATION.contains("CREATE TABLE IF NOT EXISTS graph_nodes"));
        assert!(GRAPH_MIGRATION.contains("CREATE TABLE IF NOT EXISTS graph_edges"));
    }

    #[test]
    fn test_graph_migration_enforces_topology() {
        assert!(GRAPH_MIGRATION.contains("graph_edges_exclusive_start"));
        assert!(GRAPH_MIGRATION.contains("graph_edges_exclusive_end"));
        assert!(GRAPH_MIGRATION.contains("graph_nodes_write_once"));
        assert!(GRAPH_MIGRATION.contains("graph_edges_append_only"));
        for kind in recorder_core::EdgeKind::ALL {
            assert!(GRAPH_MIGRATION.contains(kind.as_str()));
        }
    }
}
