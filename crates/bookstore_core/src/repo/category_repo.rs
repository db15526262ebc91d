//! Category repository contracts and SQLite implementation.

use crate::model::category::{Category, NewCategory};
use crate::repo::book_repo::{ensure_table_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{Connection, Row};

/// Repository interface for category operations.
pub trait CategoryRepository {
    fn create_category(&self, category: &NewCategory) -> RepoResult<Category>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "categories", &["id", "name"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &NewCategory) -> RepoResult<Category> {
        category.validate()?;

        let mut stmt = self
            .conn
            .prepare("INSERT INTO categories (name) VALUES (?1) RETURNING id, name;")?;
        let mut rows = stmt.query([category.name.as_str()])?;
        let row = rows.next()?.ok_or_else(|| {
            RepoError::InvalidData("insert into categories returned no row".to_string())
        })?;
        let created = parse_category_row(row)?;

        info!(
            "event=category_create module=repo status=ok category_id={}",
            created.id
        );
        Ok(created)
    }

    /// Lists every category ordered by id.
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();

        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
