use bookstore_core::db::migrations::{current_version, latest_version};
use bookstore_core::{
    initialize_schema, open_db, open_db_in_memory, search_books, BookRepository, BookSearchQuery,
    DatabaseConfig, DbError, NewBook, SqliteBookRepository,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "categories");
    assert_table_exists(&conn, "books");
    assert_table_exists(&conn, "books_title_fts");
    assert_table_exists(&conn, "books_author_fts");
}

#[test]
fn initialize_schema_is_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();

    initialize_schema(&mut conn).unwrap();
    initialize_schema(&mut conn).unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "books");
}

#[test]
fn initialize_schema_indexes_rows_that_already_exist() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            edition TEXT,
            price_cents INTEGER,
            file TEXT,
            category_id INTEGER NOT NULL
        );
        INSERT INTO books (title, author, category_id)
        VALUES ('Introduction to Algorithms', 'Thomas Cormen', 1);",
    )
    .unwrap();

    initialize_schema(&mut conn).unwrap();

    let by_title = search_books(&conn, &BookSearchQuery::new().title("intro")).unwrap();
    assert_eq!(by_title.len(), 1);
    let by_author = search_books(&conn, &BookSearchQuery::new().author("cormen")).unwrap();
    assert_eq!(by_author.len(), 1);

    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let deleted = repo.delete_book(by_title[0].id).unwrap().unwrap();
    assert_eq!(deleted.title, "Introduction to Algorithms");
    assert!(search_books(&conn, &BookSearchQuery::new().title("intro"))
        .unwrap()
        .is_empty());
}

#[test]
fn reopening_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookstore.db");

    let conn_first = open_db(&path).unwrap();
    let created = SqliteBookRepository::try_new(&conn_first)
        .unwrap()
        .create_book(&NewBook::new("Persisted", "Writer", 1))
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_version(&conn_second).unwrap(), latest_version());
    let loaded = SqliteBookRepository::try_new(&conn_second)
        .unwrap()
        .get_book(created.id)
        .unwrap();
    assert_eq!(loaded, Some(created));
}

#[test]
fn config_opens_file_database_from_url() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("from_url.db").display());

    let conn = DatabaseConfig::from_url(&url).unwrap().open().unwrap();
    assert_table_exists(&conn, "books");
    assert!(dir.path().join("from_url.db").exists());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn category_id_has_no_foreign_key() {
    let conn = open_db_in_memory().unwrap();

    let foreign_keys: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_foreign_key_list('books');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(foreign_keys, 0);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
