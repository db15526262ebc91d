//! Full-text search entry points.
//!
//! # Responsibility
//! - Expose book keyword search backed by the SQLite FTS5 title/author
//!   indexes.
//!
//! # See also
//! - `db/migrations/0001_catalog.sql` for the index definitions.

pub mod fts;
