//! Data store gateway: one connection and one transaction per unit of work.
//!
//! # Responsibility
//! - Open a fresh connection for every call.
//! - Commit when the unit of work succeeds, roll back when it fails.
//!
//! # Invariants
//! - No connection or transaction outlives a single `with_transaction` call.
//! - The caller's error is returned unchanged after rollback.

use super::{open_db, DbError};
use log::{debug, error, warn};
use rusqlite::Transaction;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Gateway over a SQLite database file.
#[derive(Debug, Clone)]
pub struct Gateway {
    path: PathBuf,
}

impl Gateway {
    /// Creates a gateway for the database file at `path`.
    ///
    /// The file is created and initialized lazily on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `work` inside a fresh connection and transaction.
    ///
    /// `operation` is a static label used only for log events.
    ///
    /// # Errors
    /// - Connection/bootstrap/commit failures surface as `DbError` via `E::from`.
    /// - Errors returned by `work` are passed through after rollback.
    pub fn with_transaction<T, E, F>(&self, operation: &'static str, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let started_at = Instant::now();
        let mut conn = open_db(&self.path)?;
        let tx = conn.transaction().map_err(DbError::from)?;

        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(|err| {
                    error!(
                        "event=db_tx module=db op={operation} status=error duration_ms={} error_code=commit_failed error={}",
                        started_at.elapsed().as_millis(),
                        err
                    );
                    DbError::from(err)
                })?;
                debug!(
                    "event=db_tx module=db op={operation} status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=db_tx module=db op={operation} status=error error_code=rollback_failed error={}",
                        rollback_err
                    );
                }
                warn!(
                    "event=db_tx module=db op={operation} status=rolled_back duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}
