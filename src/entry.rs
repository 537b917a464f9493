//! Entry types - bibliographic citation records
//!
//! - `NewEntry`: the fields supplied when adding a citation
//! - `EntryPatch`: a partial update, only supplied fields are written
//! - `Entry`: a full persisted record
//! - `EntrySummary`: the list-view projection returned by searches

use crate::query::dates::is_date_prefix;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A full persisted citation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Surrogate key assigned by the store
    pub id: i64,
    pub authors: String,
    pub title: String,
    /// Journal, proceedings or publisher
    pub venue: Option<String>,
    pub year: Option<i32>,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    pub publication_date: Option<String>,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    /// Free-form comma-separated tags
    pub tags: Option<String>,
    /// ISO-8601 UTC creation timestamp, never updated
    pub created_at: String,
}

impl Entry {
    /// Tags split on commas, trimmed, blanks dropped
    pub fn tag_list(&self) -> Vec<&str> {
        split_tags(self.tags.as_deref())
    }
}

/// Subset of entry columns shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: i64,
    pub authors: String,
    pub title: String,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub publication_date: Option<String>,
    pub tags: Option<String>,
    pub created_at: String,
}

/// Fields for a new citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub authors: String,
    pub title: String,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub publication_date: Option<String>,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub tags: Option<String>,
}

impl NewEntry {
    /// Create a new entry with the two required fields
    pub fn new(authors: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            authors: authors.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_publication_date(mut self, date: impl Into<String>) -> Self {
        self.publication_date = Some(date.into());
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = Some(volume.into());
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Trim everything, turn blank optionals into `None` and validate.
    ///
    /// Runs before any write so a rejected entry never touches the store.
    pub(crate) fn normalized(&self) -> Result<NewEntry> {
        let authors = self.authors.trim();
        let title = self.title.trim();
        if authors.is_empty() || title.is_empty() {
            return Err(Error::validation("Authors and Title are required"));
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        let publication_date = blank_to_none(self.publication_date.as_deref());
        if let Some(date) = &publication_date {
            validate_publication_date(date)?;
        }

        Ok(NewEntry {
            authors: authors.to_string(),
            title: title.to_string(),
            venue: blank_to_none(self.venue.as_deref()),
            year: self.year,
            publication_date,
            volume: blank_to_none(self.volume.as_deref()),
            number: blank_to_none(self.number.as_deref()),
            pages: blank_to_none(self.pages.as_deref()),
            doi: blank_to_none(self.doi.as_deref()),
            url: blank_to_none(self.url.as_deref()),
            tags: blank_to_none(self.tags.as_deref()),
        })
    }
}

/// A partial update to an entry.
///
/// Optional columns use `Option<Option<_>>`: `None` leaves the column alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub authors: Option<String>,
    pub title: Option<String>,
    pub venue: Option<Option<String>>,
    pub year: Option<Option<i32>>,
    pub publication_date: Option<Option<String>>,
    pub volume: Option<Option<String>>,
    pub number: Option<Option<String>>,
    pub pages: Option<Option<String>>,
    pub doi: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub tags: Option<Option<String>>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field is supplied
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_venue(mut self, venue: Option<String>) -> Self {
        self.venue = Some(venue);
        self
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_publication_date(mut self, date: Option<String>) -> Self {
        self.publication_date = Some(date);
        self
    }

    pub fn with_volume(mut self, volume: Option<String>) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_number(mut self, number: Option<String>) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_pages(mut self, pages: Option<String>) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_doi(mut self, doi: Option<String>) -> Self {
        self.doi = Some(doi);
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_tags(mut self, tags: Option<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Same rules as `NewEntry::normalized`, applied to supplied fields only.
    pub(crate) fn normalized(&self) -> Result<EntryPatch> {
        let required = |value: &Option<String>, label: &str| -> Result<Option<String>> {
            match value {
                Some(v) if v.trim().is_empty() => {
                    Err(Error::validation(format!("{} cannot be empty", label)))
                }
                Some(v) => Ok(Some(v.trim().to_string())),
                None => Ok(None),
            }
        };
        let optional = |value: &Option<Option<String>>| -> Option<Option<String>> {
            value.as_ref().map(|v| blank_to_none(v.as_deref()))
        };

        if let Some(Some(year)) = self.year {
            validate_year(year)?;
        }
        let publication_date = optional(&self.publication_date);
        if let Some(Some(date)) = &publication_date {
            validate_publication_date(date)?;
        }

        Ok(EntryPatch {
            authors: required(&self.authors, "Authors")?,
            title: required(&self.title, "Title")?,
            venue: optional(&self.venue),
            year: self.year,
            publication_date,
            volume: optional(&self.volume),
            number: optional(&self.number),
            pages: optional(&self.pages),
            doi: optional(&self.doi),
            url: optional(&self.url),
            tags: optional(&self.tags),
        })
    }
}

/// Parse a user-typed year, which must be exactly four digits.
pub fn parse_year(input: &str) -> Result<i32> {
    let input = input.trim();
    if input.len() != 4 || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation("Year must be a 4-digit year"));
    }
    input
        .parse()
        .map_err(|_| Error::validation("Year must be a 4-digit year"))
}

pub fn validate_year(year: i32) -> Result<()> {
    if !(0..=9999).contains(&year) {
        return Err(Error::validation("Year must be a 4-digit year"));
    }
    Ok(())
}

pub fn validate_publication_date(date: &str) -> Result<()> {
    if !is_date_prefix(date) {
        return Err(Error::validation(
            "Publication Date must be YYYY, YYYY-MM, or YYYY-MM-DD",
        ));
    }
    Ok(())
}

pub(crate) fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn split_tags(tags: Option<&str>) -> Vec<&str> {
    tags.map(|t| t.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
        .unwrap_or_default()
}
