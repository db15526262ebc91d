//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the bookstore catalog.
//! - Create the `categories`/`books` tables and their full-text indexes.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Repositories must not touch catalog data before migrations succeed.

use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

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
            Self::Sqlite(err) => write!(f, "{err}"),
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

/// Ensures the catalog tables and full-text indexes exist.
///
/// Safe to call on an already initialized database; only pending migrations
/// are applied.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file was written by a newer
///   build.
/// - [`DbError::Sqlite`] for any statement failure. Nothing is retried.
pub fn initialize_schema(conn: &mut Connection) -> DbResult<()> {
    let started_at = Instant::now();
    let from_version = migrations::current_version(conn)?;

    match migrations::apply_migrations(conn) {
        Ok(()) => {
            info!(
                "event=schema_migrate module=db status=ok from_version={} to_version={} duration_ms={}",
                from_version,
                migrations::latest_version(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_migrate module=db status=error from_version={} duration_ms={} error={}",
                from_version,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
