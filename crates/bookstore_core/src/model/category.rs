//! Category records.

use crate::model::validation::{require_text, ValidationError, MAX_NAME_CHARS};
use serde::{Deserialize, Serialize};

/// Database-assigned category identifier.
pub type CategoryId = i64;

/// Insert draft for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Checks `name` is present and fits the column.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, MAX_NAME_CHARS)
    }
}

/// Persisted category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
