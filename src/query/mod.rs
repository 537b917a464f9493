//! Query Layer - search strings and forms to typed filters
//!
//! - `parser`: the quick-search mini-language
//! - `advanced`: multi-criteria search with date ranges
//! - `dates`: date-prefix validation and range widening
//! - `filter`: the typed expression handed to the store

pub mod advanced;
pub mod dates;
pub mod filter;
pub mod parser;

pub use advanced::AdvancedSearch;
pub use dates::{END_OF_CALENDAR, is_date_prefix, prefix_to_range};
pub use filter::{Field, Filter, FilterValue};
pub use parser::parse_search;
