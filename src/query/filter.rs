//! Typed filter expressions over entry columns
//!
//! Filters are pure data. The storage layer compiles them into a predicate
//! with bound parameters, so user text never ends up inside SQL.

use serde::{Deserialize, Serialize};

/// Entry columns a filter may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Authors,
    Title,
    Venue,
    Tags,
    Year,
    PublicationDate,
    CreatedAt,
}

impl Field {
    /// Column name in the `entries` table
    pub fn column(&self) -> &'static str {
        match self {
            Field::Authors => "authors",
            Field::Title => "title",
            Field::Venue => "venue",
            Field::Tags => "tags",
            Field::Year => "year",
            Field::PublicationDate => "publication_date",
            Field::CreatedAt => "created_at",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// A literal compared with `Filter::Equals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

/// A boolean expression over entry columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Substring match
    Contains(Field, String),
    /// Prefix match
    StartsWith(Field, String),
    Equals(Field, FilterValue),
    /// `lo <= field < hi`, either bound may be open
    Range(Field, Option<String>, Option<String>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Substring match of `text` against any of `fields`
    pub fn any_contains(fields: &[Field], text: &str) -> Self {
        Filter::Or(
            fields
                .iter()
                .map(|f| Filter::Contains(*f, text.to_string()))
                .collect(),
        )
    }

    /// Combine filters with AND, flattening the trivial cases
    pub fn all(mut filters: Vec<Filter>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Filter::And(filters)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_flattens() {
        assert_eq!(Filter::all(vec![]), None);

        let single = Filter::Contains(Field::Tags, "ml".to_string());
        assert_eq!(Filter::all(vec![single.clone()]), Some(single.clone()));

        let other = Filter::Contains(Field::Authors, "Doe".to_string());
        assert_eq!(
            Filter::all(vec![single.clone(), other.clone()]),
            Some(Filter::And(vec![single, other]))
        );
    }

    #[test]
    fn test_any_contains() {
        let filter = Filter::any_contains(&[Field::Authors, Field::Title], "graph");
        match filter {
            Filter::Or(parts) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[1], Filter::Contains(Field::Title, "graph".to_string()));
            }
            other => panic!("expected Or, got {:?}", other),
        }
    }
}
