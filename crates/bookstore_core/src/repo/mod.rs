//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for books and categories.
//! - Keep SQLite statements out of the service layer.
//!
//! # Invariants
//! - Write paths validate drafts/changes before any SQL runs.
//! - Lookups report absence as `Ok(None)`; `NotFound` is reserved for
//!   handles whose row vanished underneath the caller.

pub mod book_repo;
pub mod category_repo;
