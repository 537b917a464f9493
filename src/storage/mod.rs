//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - entries(id, authors, title, venue, year, publication_date, volume, number, pages, doi, url, tags, created_at)
//! - refsets(id, name, created_at)
//! - set_entries(set_id, entry_id), both keys cascading on delete

pub mod duplicate;
pub mod predicate;
pub mod schema;
pub mod sqlite;

pub use duplicate::find_duplicate;
pub use predicate::Predicate;
pub use sqlite::{BibStore, DbStats};
