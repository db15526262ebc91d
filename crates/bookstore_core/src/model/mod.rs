//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted `Category`/`Book` records and their insert drafts.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Persisted records always carry a database-assigned id.
//! - Drafts never carry an id; SQLite assigns it on insert.

pub mod book;
pub mod category;
pub mod price;
pub mod validation;
