//! Quick-search parser
//!
//! Translates the single search box into a `Filter`. Rules are tried in
//! order and the first match wins:
//!
//! 1. `tag:<text>`
//! 2. `author:<text>`
//! 3. `created:<date prefix>`
//! 4. `pub:<date prefix>`
//! 5. a bare date prefix (`2023`, `2023-06`, `2023-06-01`)
//! 6. substring match across authors, title, tags and venue

use super::dates::is_date_prefix;
use super::filter::{Field, Filter, FilterValue};

/// Columns searched by free text
pub const TEXT_FIELDS: &[Field] = &[Field::Authors, Field::Title, Field::Tags, Field::Venue];

/// Parse a quick-search query. An empty query means "everything".
pub fn parse_search(query: &str) -> Option<Filter> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(tag) = strip_prefix_ci(query, "tag:").map(str::trim).filter(|t| !t.is_empty()) {
        return Some(Filter::Contains(Field::Tags, tag.to_string()));
    }

    if let Some(author) = strip_prefix_ci(query, "author:").map(str::trim).filter(|a| !a.is_empty()) {
        return Some(Filter::Contains(Field::Authors, author.to_string()));
    }

    if let Some(date) = strip_prefix_ci(query, "created:").filter(|d| is_date_prefix(d)) {
        return Some(Filter::StartsWith(Field::CreatedAt, date.to_string()));
    }

    if let Some(date) = strip_prefix_ci(query, "pub:").filter(|d| is_date_prefix(d)) {
        return Some(Filter::StartsWith(Field::PublicationDate, date.to_string()));
    }

    if is_date_prefix(query) {
        if query.contains('-') {
            return Some(Filter::StartsWith(Field::PublicationDate, query.to_string()));
        }
        if let Ok(year) = query.parse::<i64>() {
            return Some(Filter::Or(vec![
                Filter::Equals(Field::Year, FilterValue::Int(year)),
                Filter::StartsWith(Field::PublicationDate, query.to_string()),
            ]));
        }
    }

    Some(Filter::any_contains(TEXT_FIELDS, query))
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
