//! Data-access core for the bookstore catalog.
//!
//! Callers own the SQLite connection and pass it to every repository, search
//! and schema call; nothing here keeps a process-wide session.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, DatabaseConfig, DatabaseLocation, DATABASE_URL_ENV};
pub use db::{initialize_schema, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookChanges, BookId, NewBook};
pub use model::category::{Category, CategoryId, NewCategory};
pub use model::price::{Price, PriceError};
pub use model::validation::ValidationError;
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use search::fts::{search_books, BookSearchQuery, SearchError, SearchResult};
pub use service::bookstore_service::BookstoreService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
