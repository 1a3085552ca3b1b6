//! Persistence layer for profmatch
//!
//! SQLite-backed storage for students, professors, classes, evaluations and
//! preference profiles.

mod repository;
mod schema;

pub use repository::Repository;
pub use schema::{Schema, SCHEMA_VERSION};
