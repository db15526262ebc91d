//! Core use-case services.
//!
//! # Responsibility
//! - Present the catalog operations as one facade for request layers.
//! - Keep callers decoupled from the SQLite repositories.

pub mod bookstore_service;
