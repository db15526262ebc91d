use bookstore_core::{
    open_db_in_memory, search_books, Book, BookChanges, BookRepository, BookSearchQuery,
    BookstoreService, NewBook, SqliteBookRepository,
};
use rusqlite::Connection;

fn seed(conn: &Connection, rows: &[(&str, &str)]) -> Vec<Book> {
    let repo = SqliteBookRepository::try_new(conn).unwrap();
    rows.iter()
        .map(|(title, author)| repo.create_book(&NewBook::new(*title, *author, 1)).unwrap())
        .collect()
}

fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().map(|book| book.title.as_str()).collect()
}

#[test]
fn title_search_matches_token_prefixes_only() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[
            ("Introduction to Algorithms", "Thomas Cormen"),
            ("Advanced Rust", "Jon Gjengset"),
            ("The Introvert Advantage", "Marti Olsen Laney"),
            ("Nonintroductory Topology", "Some Author"),
        ],
    );

    let hits = search_books(&conn, &BookSearchQuery::new().title("Intro")).unwrap();
    assert_eq!(
        titles(&hits),
        vec!["Introduction to Algorithms", "The Introvert Advantage"]
    );
}

#[test]
fn search_is_case_and_diacritic_insensitive() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[("Études for Piano", "Frédéric Chopin"), ("Rust in Action", "Tim McNamara")],
    );

    let by_title = search_books(&conn, &BookSearchQuery::new().title("etude")).unwrap();
    assert_eq!(titles(&by_title), vec!["Études for Piano"]);

    let by_author = search_books(&conn, &BookSearchQuery::new().author("FREDERIC")).unwrap();
    assert_eq!(titles(&by_author), vec!["Études for Piano"]);
}

#[test]
fn both_terms_intersect_by_default_and_union_with_or() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[
            ("Programming Rust", "Jim Blandy"),
            ("Programming Pearls", "Jon Bentley"),
            ("Rust for Rustaceans", "Jon Gjengset"),
            ("Cooking Basics", "Ann Smith"),
        ],
    );

    let and_query = BookSearchQuery::new().title("Rust").author("Jon");
    let intersection = search_books(&conn, &and_query).unwrap();
    assert_eq!(titles(&intersection), vec!["Rust for Rustaceans"]);

    let or_query = and_query.combine_with_or(true);
    let union = search_books(&conn, &or_query).unwrap();
    assert_eq!(
        titles(&union),
        vec!["Programming Rust", "Programming Pearls", "Rust for Rustaceans"]
    );
}

#[test]
fn no_terms_return_empty_results() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[("Anything", "Anyone")]);

    assert!(search_books(&conn, &BookSearchQuery::new()).unwrap().is_empty());
    assert!(search_books(&conn, &BookSearchQuery::new().combine_with_or(true))
        .unwrap()
        .is_empty());

    let blank = BookSearchQuery::new().title("   ").author("");
    assert!(search_books(&conn, &blank).unwrap().is_empty());
}

#[test]
fn no_terms_do_not_touch_the_database() {
    // Tables are missing here, so any executed statement would fail.
    let conn = Connection::open_in_memory().unwrap();
    assert!(search_books(&conn, &BookSearchQuery::new()).unwrap().is_empty());
}

#[test]
fn multi_word_terms_require_every_word() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[
            ("The Rust Programming Language", "Steve Klabnik"),
            ("Programming in Lua", "Roberto Ierusalimschy"),
        ],
    );

    let hits = search_books(&conn, &BookSearchQuery::new().title("prog rust")).unwrap();
    assert_eq!(titles(&hits), vec!["The Rust Programming Language"]);
}

#[test]
fn fts_syntax_in_terms_is_treated_as_text() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[("NOT a Cookbook", "A. Nonymous")]);

    let hits = search_books(&conn, &BookSearchQuery::new().title("NOT")).unwrap();
    assert_eq!(hits.len(), 1);

    for term in ["\"unterminated", "a:b", "(x OR", "title:*", "NEAR("] {
        search_books(&conn, &BookSearchQuery::new().title(term)).unwrap();
    }
}

#[test]
fn punctuation_only_term_never_matches() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[("Clean Code", "Robert Martin")]);

    let and_query = BookSearchQuery::new().title("***").author("Robert");
    assert!(search_books(&conn, &and_query).unwrap().is_empty());

    let or_query = and_query.combine_with_or(true);
    assert_eq!(titles(&search_books(&conn, &or_query).unwrap()), vec!["Clean Code"]);
}

#[test]
fn index_follows_updates_and_deletes() {
    let conn = open_db_in_memory().unwrap();
    let books = seed(
        &conn,
        &[("Alpha Centauri", "First Writer"), ("Beta Testing", "Second Writer")],
    );
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.update_book(
        Some(books[0].clone()),
        &BookChanges::new().title("Gamma Rays").author("Third Writer"),
    )
    .unwrap();

    assert!(search_books(&conn, &BookSearchQuery::new().title("alpha"))
        .unwrap()
        .is_empty());
    assert!(search_books(&conn, &BookSearchQuery::new().author("first"))
        .unwrap()
        .is_empty());
    let renamed = search_books(&conn, &BookSearchQuery::new().title("gamma")).unwrap();
    assert_eq!(renamed.len(), 1);
    assert_eq!(renamed[0].id, books[0].id);
    assert_eq!(renamed[0].author, "Third Writer");

    repo.delete_book(books[1].id).unwrap();
    assert!(search_books(&conn, &BookSearchQuery::new().title("beta"))
        .unwrap()
        .is_empty());
}

#[test]
fn non_text_updates_keep_index_entries() {
    let conn = open_db_in_memory().unwrap();
    let books = seed(&conn, &[("Stable Title", "Stable Author")]);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.update_book(Some(books[0].clone()), &BookChanges::new().category_id(5))
        .unwrap();

    let hits = search_books(&conn, &BookSearchQuery::new().title("stable")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category_id, 5);
}

#[test]
fn service_and_repository_delegate_to_search() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[("Designing Data-Intensive Applications", "Martin Kleppmann")]);

    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let query = BookSearchQuery::new().author("klepp");
    assert_eq!(repo.search_books(&query).unwrap().len(), 1);

    let service = BookstoreService::sqlite(&conn).unwrap();
    let hits = service.search_books(&query).unwrap();
    assert_eq!(titles(&hits), vec!["Designing Data-Intensive Applications"]);
}

#[test]
fn words_without_index_tokens_do_not_block_other_words() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[("Clean Code", "Robert Martin"), ("Dirty Code", "Someone Else")]);

    let hits = search_books(&conn, &BookSearchQuery::new().title("Ⓐ clean")).unwrap();
    assert_eq!(titles(&hits), vec!["Clean Code"]);

    let hits = search_books(&conn, &BookSearchQuery::new().author("-- robert ::")).unwrap();
    assert_eq!(titles(&hits), vec!["Clean Code"]);
}
