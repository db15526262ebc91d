//! Field validation shared by catalog drafts and change sets.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Column widths of the catalog schema, in characters.
pub const MAX_NAME_CHARS: usize = 255;
pub const MAX_TITLE_CHARS: usize = 255;
pub const MAX_AUTHOR_CHARS: usize = 255;
pub const MAX_EDITION_CHARS: usize = 50;
pub const MAX_FILE_CHARS: usize = 255;

/// Rejected field value on a write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text is empty or whitespace only.
    BlankField { field: &'static str },
    /// Text exceeds the column width.
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { field } => write!(f, "`{field}` must not be blank"),
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "`{field}` is {actual_chars} characters long; at most {max_chars} allowed"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    check_width(field, value, max_chars)
}

pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => check_width(field, value, max_chars),
        None => Ok(()),
    }
}

fn check_width(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::FieldTooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}
