//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/update/delete over the `books` table.
//! - Own the shared repository error type and connection readiness checks.
//!
//! # Invariants
//! - Every write is a single autocommitted statement.
//! - Returned books are always read back from the row SQLite stored.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::book::{Book, BookChanges, BookId, NewBook};
use crate::model::price::Price;
use crate::model::validation::ValidationError;
use crate::search::fts::{search_books, BookSearchQuery, SearchResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const BOOK_COLUMNS: &str =
    "id, title, author, edition, price_cents, file, category_id";

const REQUIRED_BOOK_COLUMNS: &[&str] = &[
    "id",
    "title",
    "author",
    "edition",
    "price_cents",
    "file",
    "category_id",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(BookId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}; open it with open_db or run initialize_schema"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book operations.
pub trait BookRepository {
    fn create_book(&self, book: &NewBook) -> RepoResult<Book>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// A `None` handle is passed through untouched.
    fn update_book(&self, book: Option<Book>, changes: &BookChanges) -> RepoResult<Option<Book>>;
    /// Returns the removed row, detached from storage, or `None` when absent.
    fn delete_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn search_books(&self, query: &BookSearchQuery) -> SearchResult<Vec<Book>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were never applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the `books`
    ///   table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "books", REQUIRED_BOOK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        book.validate()?;

        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO books (title, author, edition, price_cents, file, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {BOOK_COLUMNS};"
        ))?;
        let mut rows = stmt.query(params![
            book.title.as_str(),
            book.author.as_str(),
            book.edition.as_deref(),
            book.price.map(Price::cents),
            book.file.as_deref(),
            book.category_id,
        ])?;

        let row = rows.next()?.ok_or_else(|| {
            RepoError::InvalidData("insert into books returned no row".to_string())
        })?;
        let created = parse_book_row(row)?;

        info!(
            "event=book_create module=repo status=ok book_id={} category_id={}",
            created.id, created.category_id
        );
        Ok(created)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn update_book(&self, book: Option<Book>, changes: &BookChanges) -> RepoResult<Option<Book>> {
        let Some(book) = book else {
            return Ok(None);
        };
        changes.validate()?;

        if changes.is_empty() {
            return match self.get_book(book.id)? {
                Some(current) => Ok(Some(current)),
                None => Err(RepoError::NotFound(book.id)),
            };
        }

        let (assignments, mut bind_values) = update_assignments(changes);

        let sql = format!(
            "UPDATE books SET {} WHERE id = ? RETURNING {BOOK_COLUMNS};",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(book.id));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let Some(row) = rows.next()? else {
            return Err(RepoError::NotFound(book.id));
        };
        let refreshed = parse_book_row(row)?;

        info!(
            "event=book_update module=repo status=ok book_id={} columns={}",
            refreshed.id,
            assignments.len()
        );
        Ok(Some(refreshed))
    }

    fn delete_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self.conn.prepare(&format!(
            "DELETE FROM books WHERE id = ?1 RETURNING {BOOK_COLUMNS};"
        ))?;

        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            info!("event=book_delete module=repo status=not_found book_id={id}");
            return Ok(None);
        };
        let deleted = parse_book_row(row)?;

        info!("event=book_delete module=repo status=ok book_id={id}");
        Ok(Some(deleted))
    }

    fn search_books(&self, query: &BookSearchQuery) -> SearchResult<Vec<Book>> {
        search_books(self.conn, query)
    }
}

fn update_assignments(changes: &BookChanges) -> (Vec<&'static str>, Vec<Value>) {
    let mut assignments = Vec::new();
    let mut bind_values = Vec::new();

    if let Some(title) = &changes.title {
        assignments.push("title = ?");
        bind_values.push(Value::Text(title.clone()));
    }
    if let Some(author) = &changes.author {
        assignments.push("author = ?");
        bind_values.push(Value::Text(author.clone()));
    }
    if let Some(edition) = &changes.edition {
        assignments.push("edition = ?");
        bind_values.push(text_or_null(edition.as_deref()));
    }
    if let Some(price) = changes.price {
        assignments.push("price_cents = ?");
        bind_values.push(price.map_or(Value::Null, |price| Value::Integer(price.cents())));
    }
    if let Some(file) = &changes.file {
        assignments.push("file = ?");
        bind_values.push(text_or_null(file.as_deref()));
    }
    if let Some(category_id) = changes.category_id {
        assignments.push("category_id = ?");
        bind_values.push(Value::Integer(category_id));
    }

    (assignments, bind_values)
}

fn text_or_null(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

pub(crate) fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;

    let price = match row.get::<_, Option<i64>>("price_cents")? {
        Some(cents) => Some(Price::from_cents(cents).map_err(|err| {
            RepoError::InvalidData(format!("book {id} has invalid books.price_cents: {err}"))
        })?),
        None => None,
    };

    Ok(Book {
        id,
        title: row.get("title")?,
        author: row.get("author")?,
        edition: row.get("edition")?,
        price,
        file: row.get("file")?,
        category_id: row.get("category_id")?,
    })
}

/// Verifies the connection is migrated and `table` carries `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    let expected_version = latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let existing = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    if existing.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }

    if let Some(column) = columns
        .iter()
        .copied()
        .find(|column| !existing.contains(*column))
    {
        return Err(RepoError::MissingRequiredColumn { table, column });
    }

    Ok(())
}
