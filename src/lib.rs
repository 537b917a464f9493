//! # Bibshelf - Personal Bibliography Manager
//!
//! Bibshelf keeps a personal bibliography in a single SQLite file.
//!
//! Bibshelf provides:
//! - Citation entries with application-level duplicate detection
//! - Named reference sets with many-to-many membership
//! - A quick-search mini-language and an advanced range search, both
//!   translated into typed filters that the store compiles to bound SQL
//! - BibTeX rendering and whole-set export

pub mod entry;
pub mod refset;
pub mod storage;
pub mod query;
pub mod export;
pub mod selection;
pub mod ui;
pub mod output;
pub mod config;


// Re-exports for convenient access
pub use entry::{Entry, EntryPatch, EntrySummary, NewEntry};
pub use refset::ReferenceSet;
pub use storage::BibStore;
pub use query::{AdvancedSearch, Field, Filter, parse_search, prefix_to_range};
pub use export::{entry_to_bibtex, export_refset};
pub use selection::Selection;

/// Result type alias for Bibshelf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Bibshelf operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Duplicate entry detected (same Title + Authors + Publication Date) as id {id}")]
    DuplicateEntry { id: i64 },

    #[error("A reference set named '{name}' already exists (id {id})")]
    DuplicateRefSet { id: i64, name: String },

    #[error("Entry not found: {0}")]
    EntryNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Id of the existing record a duplicate error collided with
    pub fn conflicting_id(&self) -> Option<i64> {
        match self {
            Error::DuplicateEntry { id } | Error::DuplicateRefSet { id, .. } => Some(*id),
            _ => None,
        }
    }
}
