//! Book records, insert drafts and partial change sets.
//!
//! # Invariants
//! - `title` and `author` are non-blank on every write.
//! - `category_id` is always set; whether that category exists is not checked.
//! - `BookChanges` distinguishes "leave unchanged" from "set to NULL" for
//!   nullable columns.

use crate::model::category::CategoryId;
use crate::model::price::Price;
use crate::model::validation::{
    optional_text, require_text, ValidationError, MAX_AUTHOR_CHARS, MAX_EDITION_CHARS,
    MAX_FILE_CHARS, MAX_TITLE_CHARS,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Database-assigned book identifier.
pub type BookId = i64;

/// Insert draft for a book. The id is assigned by SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    /// Stored file reference, usually a relative path.
    #[serde(default)]
    pub file: Option<String>,
    pub category_id: CategoryId,
}

impl NewBook {
    /// Creates a draft with only the required columns set.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category_id: CategoryId,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            edition: None,
            price: None,
            file: None,
            category_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title, MAX_TITLE_CHARS)?;
        require_text("author", &self.author, MAX_AUTHOR_CHARS)?;
        optional_text("edition", self.edition.as_deref(), MAX_EDITION_CHARS)?;
        optional_text("file", self.file.as_deref(), MAX_FILE_CHARS)
    }
}

/// Persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub edition: Option<String>,
    pub price: Option<Price>,
    pub file: Option<String>,
    pub category_id: CategoryId,
}

impl Book {
    /// Returns the insert draft carrying the same column values.
    pub fn to_draft(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            edition: self.edition.clone(),
            price: self.price,
            file: self.file.clone(),
            category_id: self.category_id,
        }
    }
}

/// Partial update for a book: one entry per column to overwrite.
///
/// `None` leaves a column untouched. For nullable columns `Some(None)` clears
/// the stored value. Decodes from a field-name map such as
/// `{"price": "9.99", "edition": null}`; unknown field names are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub edition: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Option<Price>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub file: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl BookChanges {
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

    pub fn edition(mut self, edition: Option<String>) -> Self {
        self.edition = Some(edition);
        self
    }

    pub fn price(mut self, price: Option<Price>) -> Self {
        self.price = Some(price);
        self
    }

    pub fn file(mut self, file: Option<String>) -> Self {
        self.file = Some(file);
        self
    }

    pub fn category_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Returns `true` when no column would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.edition.is_none()
            && self.price.is_none()
            && self.file.is_none()
            && self.category_id.is_none()
    }

    /// Validates only the fields present in this change set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require_text("title", title, MAX_TITLE_CHARS)?;
        }
        if let Some(author) = &self.author {
            require_text("author", author, MAX_AUTHOR_CHARS)?;
        }
        if let Some(edition) = &self.edition {
            optional_text("edition", edition.as_deref(), MAX_EDITION_CHARS)?;
        }
        if let Some(file) = &self.file {
            optional_text("file", file.as_deref(), MAX_FILE_CHARS)?;
        }
        Ok(())
    }
}

// A present key (even `null`) becomes `Some(..)`; a missing key hits `default`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::{Book, BookChanges, NewBook};
    use crate::model::price::Price;
    use crate::model::validation::ValidationError;

    fn sample_book() -> Book {
        Book {
            id: 7,
            title: "Introduction to Algorithms".to_string(),
            author: "Cormen".to_string(),
            edition: Some("3rd".to_string()),
            price: Some(Price::from_cents(8999).unwrap()),
            file: Some("books/clrs.pdf".to_string()),
            category_id: 1,
        }
    }

    #[test]
    fn new_book_rejects_blank_title_and_author() {
        let err = NewBook::new(" ", "Someone", 1).validate().unwrap_err();
        assert_eq!(err, ValidationError::BlankField { field: "title" });

        let err = NewBook::new("Title", "", 1).validate().unwrap_err();
        assert_eq!(err, ValidationError::BlankField { field: "author" });
    }

    #[test]
    fn new_book_rejects_oversized_edition() {
        let mut draft = NewBook::new("Title", "Author", 1);
        draft.edition = Some("x".repeat(51));
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::FieldTooLong {
                field: "edition",
                ..
            })
        ));
    }

    #[test]
    fn changes_decode_null_as_clear_and_missing_as_untouched() {
        let changes: BookChanges =
            serde_json::from_str(r#"{"edition": null, "price": "10.00"}"#).unwrap();

        assert_eq!(changes.edition, Some(None));
        assert_eq!(changes.price, Some(Some(Price::from_cents(1000).unwrap())));
        assert_eq!(changes.file, None);
        assert_eq!(changes.title, None);
        assert!(!changes.is_empty());
    }

    #[test]
    fn changes_reject_unknown_fields() {
        let result = serde_json::from_str::<BookChanges>(r#"{"id": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn changes_validate_present_fields_only() {
        assert!(BookChanges::new().validate().is_ok());
        assert!(BookChanges::new().edition(None).validate().is_ok());
        assert_eq!(
            BookChanges::new().author("  ").validate(),
            Err(ValidationError::BlankField { field: "author" })
        );
    }

    #[test]
    fn to_draft_keeps_every_column() {
        let book = sample_book();
        let draft = book.to_draft();
        assert_eq!(draft.title, book.title);
        assert_eq!(draft.price, book.price);
        assert_eq!(draft.category_id, book.category_id);
    }
}
