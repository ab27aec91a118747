//! SQLite storage bootstrap and transaction boundary.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Ensure the baseline schema exists before data access.
//! - Run units of work inside one connection and one transaction.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No statement runs outside a `Gateway` transaction in repository code.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod gateway;
mod open;
pub mod schema;

pub use gateway::Gateway;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Store failure carrying the underlying cause.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
