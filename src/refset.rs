//! Reference sets - named, user-curated collections of entries

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A named collection of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    pub id: i64,
    /// Unique, stored trimmed
    pub name: String,
    pub created_at: String,
}

/// Trim a set name, rejecting blank names.
pub(crate) fn normalize_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Set name is required"));
    }
    Ok(name)
}
