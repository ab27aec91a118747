//! Baseline schema bootstrap.
//!
//! # Responsibility
//! - Create the project/material/step/category tables on first open.
//! - Refuse databases written by a newer binary.
//!
//! # Invariants
//! - The baseline is applied atomically together with `PRAGMA user_version`.
//! - Re-applying on an up-to-date database is a no-op.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const BASELINE_SQL: &str = include_str!("schema.sql");

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

/// Tables the repository layer reads and writes.
pub const TABLES: &[&str] = &["project", "material", "step", "category", "project_category"];

/// Creates the baseline schema when the database has not been initialized.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(BASELINE_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads the schema version recorded in the database header.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
