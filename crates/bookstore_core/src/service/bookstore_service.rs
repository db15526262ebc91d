//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide the book/category entry points consumed by request layers.
//! - Delegate persistence and search to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::model::book::{Book, BookChanges, BookId, NewBook};
use crate::model::category::{Category, NewCategory};
use crate::repo::book_repo::{BookRepository, RepoResult, SqliteBookRepository};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::search::fts::{BookSearchQuery, SearchResult};
use rusqlite::Connection;

/// Use-case facade over book and category repositories.
pub struct BookstoreService<B: BookRepository, C: CategoryRepository> {
    books: B,
    categories: C,
}

impl<'conn> BookstoreService<SqliteBookRepository<'conn>, SqliteCategoryRepository<'conn>> {
    /// Builds a service backed by SQLite repositories on one connection.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteBookRepository::try_new(conn)?,
            SqliteCategoryRepository::try_new(conn)?,
        ))
    }
}

impl<B: BookRepository, C: CategoryRepository> BookstoreService<B, C> {
    pub fn new(books: B, categories: C) -> Self {
        Self { books, categories }
    }

    /// Gets one book by id; `Ok(None)` when it does not exist.
    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.books.get_book(id)
    }

    /// Persists a new book and returns it with its generated id.
    pub fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        self.books.create_book(book)
    }

    /// Applies `changes` to an existing book and returns the refreshed row.
    ///
    /// A `None` handle is returned as-is without touching storage.
    pub fn update_book(
        &self,
        book: Option<Book>,
        changes: &BookChanges,
    ) -> RepoResult<Option<Book>> {
        self.books.update_book(book, changes)
    }

    /// Deletes a book by id and returns the removed row, if any.
    pub fn delete_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.books.delete_book(id)
    }

    pub fn create_category(&self, category: &NewCategory) -> RepoResult<Category> {
        self.categories.create_category(category)
    }

    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.categories.list_categories()
    }

    /// Prefix keyword search over titles and authors.
    pub fn search_books(&self, query: &BookSearchQuery) -> SearchResult<Vec<Book>> {
        self.books.search_books(query)
    }
}
