//! Database endpoint configuration.
//!
//! # Responsibility
//! - Resolve the catalog database location from `DATABASE_URL`.
//! - Open a migrated connection for the resolved location.
//!
//! # Accepted forms
//! - `sqlite::memory:` / `:memory:` for a private in-memory database.
//! - `sqlite://<path>` / `sqlite:<path>` for a file, query string ignored.
//! - A bare filesystem path.

use crate::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable holding the database connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const MEMORY_URLS: &[&str] = &["sqlite::memory:", ":memory:", "sqlite://:memory:"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable is unset or blank.
    Missing(&'static str),
    /// The URL names a scheme other than `sqlite`.
    UnsupportedScheme(String),
    /// A `sqlite:` URL without a path.
    EmptyPath(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "environment variable `{name}` is not set"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "unsupported database scheme `{scheme}`; only sqlite is available"
            ),
            Self::EmptyPath(url) => write!(f, "database url `{url}` has no file path"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub location: DatabaseLocation,
}

impl DatabaseConfig {
    /// Reads and parses `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(DATABASE_URL_ENV) {
            Some(raw) if !raw.trim().is_empty() => Self::from_url(&raw),
            _ => Err(ConfigError::Missing(DATABASE_URL_ENV)),
        }
    }

    /// Parses a connection string.
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let url = raw.trim();
        if url.is_empty() {
            return Err(ConfigError::Missing(DATABASE_URL_ENV));
        }

        if MEMORY_URLS.contains(&url) {
            return Ok(Self {
                location: DatabaseLocation::InMemory,
            });
        }

        let path = match url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
        {
            Some(rest) => {
                let path = rest.split_once('?').map_or(rest, |(path, _)| path);
                if path.is_empty() {
                    return Err(ConfigError::EmptyPath(url.to_string()));
                }
                path
            }
            None => {
                if let Some((scheme, _)) = url.split_once("://") {
                    return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
                }
                url
            }
        };

        Ok(Self {
            location: DatabaseLocation::File(PathBuf::from(path)),
        })
    }

    /// Opens a connection for this location with the schema initialized.
    pub fn open(&self) -> DbResult<Connection> {
        match &self.location {
            DatabaseLocation::InMemory => open_db_in_memory(),
            DatabaseLocation::File(path) => open_db(path),
        }
    }
}
