//! SQLite FTS5-based book search.
//!
//! # Responsibility
//! - Translate title/author keywords into escaped prefix MATCH expressions.
//! - Combine the per-column conditions with AND (default) or OR.
//!
//! # Invariants
//! - User text is always quoted; it is never parsed as raw FTS5 syntax.
//! - No statement runs when neither term carries text.
//! - Results are ordered by book id.

use crate::db::DbError;
use crate::model::book::Book;
use crate::repo::book_repo::{parse_book_row, RepoError, BOOK_COLUMNS};
use log::debug;
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

// Same tokenizer settings as the FTS5 indexes in `0001_catalog.sql`.
const TOKENIZER_TABLE: &str = "book_search_tokenizer";

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for query parsing, DB interaction and result decoding.
#[derive(Debug)]
pub enum SearchError {
    /// The engine rejected the generated MATCH expression.
    InvalidQuery {
        query: String,
        message: String,
    },
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid full-text query `{query}`: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidQuery { .. } => None,
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SearchError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) => Self::Db(err),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

/// Keyword search options.
///
/// Blank terms count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Match either term instead of requiring both.
    pub combine_with_or: bool,
}

impl BookSearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn combine_with_or(mut self, combine_with_or: bool) -> Self {
        self.combine_with_or = combine_with_or;
        self
    }
}

/// Searches books by title and/or author prefix terms.
///
/// Each whitespace-separated word of a term must appear as a token prefix in
/// its column, case-insensitively. Returns an empty list without querying
/// when both terms are missing or blank.
pub fn search_books(conn: &Connection, query: &BookSearchQuery) -> SearchResult<Vec<Book>> {
    let started_at = Instant::now();
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<String> = Vec::new();

    let terms = [
        (query.title.as_deref(), "books_title_fts"),
        (query.author.as_deref(), "books_author_fts"),
    ];
    for (term, fts_table) in terms {
        let Some(term) = term.map(str::trim).filter(|term| !term.is_empty()) else {
            continue;
        };
        let words = tokenizable_words(conn, term)?;
        match build_prefix_expression(&words) {
            Some(expr) => {
                conditions.push(format!(
                    "books.id IN (SELECT rowid FROM {fts_table} WHERE {fts_table} MATCH ?)"
                ));
                bind_values.push(expr);
            }
            // No word yields a token, so the term can never match.
            None => conditions.push("0".to_string()),
        }
    }

    if conditions.is_empty() {
        return Ok(Vec::new());
    }

    let joiner = if query.combine_with_or { " OR " } else { " AND " };
    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE {} ORDER BY books.id ASC;",
        conditions.join(joiner)
    );
    let match_exprs = bind_values.join(joiner);

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query(params_from_iter(bind_values.iter()))
        .map_err(|err| map_query_error(err, &match_exprs))?;
    let mut books = Vec::new();

    while let Some(row) = rows
        .next()
        .map_err(|err| map_query_error(err, &match_exprs))?
    {
        books.push(parse_book_row(row)?);
    }

    debug!(
        "event=book_search module=search status=ok conditions={} combine={} hits={} duration_ms={}",
        conditions.len(),
        joiner.trim(),
        books.len(),
        started_at.elapsed().as_millis()
    );
    Ok(books)
}

/// Keeps the words of `term` that the index tokenizer turns into at least
/// one token. Quoting a word that yields none would form an empty phrase,
/// which matches no row.
fn tokenizable_words<'t>(conn: &Connection, term: &'t str) -> SearchResult<Vec<&'t str>> {
    conn.execute_batch(&format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS temp.{TOKENIZER_TABLE}
         USING fts3tokenize('unicode61', 'remove_diacritics=2');"
    ))?;

    let mut stmt = conn.prepare_cached(&format!(
        "SELECT EXISTS(SELECT 1 FROM temp.{TOKENIZER_TABLE} WHERE input = ?1);"
    ))?;
    let mut words = Vec::new();
    for word in term.split_whitespace() {
        if stmt.query_row([word], |row| row.get::<_, bool>(0))? {
            words.push(word);
        }
    }

    Ok(words)
}

/// Builds `"word1"* AND "word2"*`, or `None` when there are no words.
fn build_prefix_expression(words: &[&str]) -> Option<String> {
    if words.is_empty() {
        return None;
    }

    let terms = words
        .iter()
        .map(|word| escape_prefix_term(word))
        .collect::<Vec<_>>();
    Some(terms.join(" AND "))
}

fn escape_prefix_term(raw: &str) -> String {
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"*")
}

fn map_query_error(err: rusqlite::Error, query: &str) -> SearchError {
    if is_match_syntax_error(&err) {
        return SearchError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        };
    }

    SearchError::Db(DbError::Sqlite(err))
}

fn is_match_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let msg = message.to_lowercase();
            (msg.contains("fts5") && msg.contains("syntax"))
                || msg.contains("malformed match expression")
                || msg.contains("unterminated")
        }
        _ => false,
    }
}
