//! Advanced search - several optional criteria combined with AND

use super::dates::prefix_to_range;
use super::filter::{Field, Filter};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Columns searched by the free-text criterion
const TEXT_FIELDS: &[Field] = &[Field::Authors, Field::Title, Field::Venue, Field::Tags];

/// Criteria of the advanced search form. Blank values are ignored.
///
/// Date bounds are date prefixes. A range with both bounds covers
/// `from.start .. to.end`, from-only means on/after `from`, to-only means
/// before the end of `to`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSearch {
    pub text: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub pub_from: Option<String>,
    pub pub_to: Option<String>,
}

impl AdvancedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the combined filter; `None` when every criterion is blank.
    pub fn to_filter(&self) -> Result<Option<Filter>> {
        let mut parts = Vec::new();

        if let Some(text) = non_blank(&self.text) {
            parts.push(Filter::any_contains(TEXT_FIELDS, text));
        }
        if let Some(tag) = non_blank(&self.tag) {
            parts.push(Filter::Contains(Field::Tags, tag.to_string()));
        }
        if let Some(author) = non_blank(&self.author) {
            parts.push(Filter::Contains(Field::Authors, author.to_string()));
        }
        if let Some(range) = date_range(
            Field::CreatedAt,
            non_blank(&self.created_from),
            non_blank(&self.created_to),
            "Created",
        )? {
            parts.push(range);
        }
        if let Some(range) = date_range(
            Field::PublicationDate,
            non_blank(&self.pub_from),
            non_blank(&self.pub_to),
            "Publication",
        )? {
            parts.push(range);
        }

        Ok(Filter::all(parts))
    }
}

fn date_range(field: Field, from: Option<&str>, to: Option<&str>, label: &str) -> Result<Option<Filter>> {
    let from = from
        .map(|f| prefix_to_range(f).map_err(|_| bound_error(label, "From")))
        .transpose()?;
    let to = to
        .map(|t| prefix_to_range(t).map_err(|_| bound_error(label, "To")))
        .transpose()?;

    let filter = match (from, to) {
        (Some((start, _)), Some((_, end))) => Filter::Range(field, Some(start), Some(end)),
        (Some((start, _)), None) => Filter::Range(field, Some(start), None),
        (None, Some((_, end))) => Filter::Range(field, None, Some(end)),
        (None, None) => return Ok(None),
    };
    Ok(Some(filter))
}

fn bound_error(label: &str, bound: &str) -> Error {
    Error::validation(format!(
        "{} {} must be YYYY, YYYY-MM, or YYYY-MM-DD",
        label, bound
    ))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
