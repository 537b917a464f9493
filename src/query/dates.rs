//! Date prefixes - partial ISO dates used for prefix and range matching
//!
//! A date prefix is `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. `prefix_to_range`
//! widens one into a half-open `[start, end)` interval of exact days.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

static DATE_PREFIX: OnceLock<Regex> = OnceLock::new();

/// Exclusive end bound for periods that close at the end of year 9999.
///
/// Month 13 does not exist, so this sorts after every `9999-MM-DD` date
/// and every `9999-...` timestamp.
pub const END_OF_CALENDAR: &str = "9999-13-01";

fn date_prefix_regex() -> &'static Regex {
    DATE_PREFIX.get_or_init(|| {
        Regex::new(r"^[0-9]{4}(-[0-9]{2}){0,2}$").expect("date prefix pattern is valid")
    })
}

/// Whether `s` is shaped like `YYYY`, `YYYY-MM` or `YYYY-MM-DD` (ASCII digits only)
pub fn is_date_prefix(s: &str) -> bool {
    date_prefix_regex().is_match(s)
}

/// Convert a date prefix into `[start, end)` day boundaries.
///
/// - `2023` -> `2023-01-01 .. 2024-01-01`
/// - `2023-12` -> `2023-12-01 .. 2024-01-01`
/// - `2023-02-28` -> `2023-02-28 .. 2023-03-01`
/// - any period ending with 9999-12-31 -> `.. END_OF_CALENDAR`
pub fn prefix_to_range(prefix: &str) -> Result<(String, String)> {
    if !is_date_prefix(prefix) {
        return Err(invalid_prefix());
    }

    // The pattern guarantees only ASCII digit groups remain
    let parts: Vec<u32> = prefix
        .split('-')
        .map(|p| p.parse().map_err(|_| invalid_prefix()))
        .collect::<Result<_>>()?;

    let (start, end) = match parts.as_slice() {
        [y] => {
            let y = *y as i32;
            (first_day(y, 1, prefix)?, NaiveDate::from_ymd_opt(y + 1, 1, 1))
        }
        [y, m] => {
            if !(1..=12).contains(m) {
                return Err(Error::validation(format!("Invalid month in date: {}", prefix)));
            }
            let y = *y as i32;
            let next = if *m == 12 {
                NaiveDate::from_ymd_opt(y + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(y, m + 1, 1)
            };
            (first_day(y, *m, prefix)?, next)
        }
        [y, m, d] => {
            let day = NaiveDate::from_ymd_opt(*y as i32, *m, *d)
                .ok_or_else(|| Error::validation(format!("Invalid calendar date: {}", prefix)))?;
            let next = NaiveDate::from_num_days_from_ce_opt(day.num_days_from_ce() + 1);
            (day, next)
        }
        _ => return Err(invalid_prefix()),
    };

    Ok((format_day(start), end_bound(end)))
}

fn first_day(year: i32, month: u32, prefix: &str) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::validation(format!("Date out of range: {}", prefix)))
}

fn format_day(day: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", day.year(), day.month(), day.day())
}

fn end_bound(day: Option<NaiveDate>) -> String {
    match day {
        Some(day) if day.year() <= 9999 => format_day(day),
        _ => END_OF_CALENDAR.to_string(),
    }
}

fn invalid_prefix() -> Error {
    Error::validation("Date must be YYYY, YYYY-MM, or YYYY-MM-DD")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_date_prefix() {
        assert!(is_date_prefix("2023"));
        assert!(is_date_prefix("2023-06"));
        assert!(is_date_prefix("2023-06-01"));
        assert!(!is_date_prefix("23"));
        assert!(!is_date_prefix("2023-6"));
        assert!(!is_date_prefix("2023-06-01-02"));
        assert!(!is_date_prefix("tag:2023"));
    }

    #[test]
    fn test_non_ascii_digits_are_not_dates() {
        assert!(!is_date_prefix("٢٠٢٣"));
        assert!(!is_date_prefix("２０２３-０１"));
        assert!(matches!(prefix_to_range("٢٠٢٣"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_last_year_ends_after_every_9999_date() {
        for prefix in ["9999", "9999-12", "9999-12-31"] {
            let (start, end) = prefix_to_range(prefix).unwrap();
            assert_eq!(end, END_OF_CALENDAR);
            assert!(start.as_str() < end.as_str());
            assert!("9999-12-31" < end.as_str());
            assert!("9999-12-31T23:59:59.999999" < end.as_str());
        }
        assert_eq!(
            prefix_to_range("9998-12-31").unwrap(),
            ("9998-12-31".to_string(), "9999-01-01".to_string())
        );
        assert_eq!(
            prefix_to_range("0000").unwrap(),
            ("0000-01-01".to_string(), "0001-01-01".to_string())
        );
    }

    #[test]
    fn test_year_range() {
        assert_eq!(
            prefix_to_range("2023").unwrap(),
            ("2023-01-01".to_string(), "2024-01-01".to_string())
        );
    }

    #[test]
    fn test_month_range_rolls_over_year() {
        assert_eq!(
            prefix_to_range("2023-12").unwrap(),
            ("2023-12-01".to_string(), "2024-01-01".to_string())
        );
        assert_eq!(
            prefix_to_range("2023-04").unwrap(),
            ("2023-04-01".to_string(), "2023-05-01".to_string())
        );
    }

    #[test]
    fn test_day_range_rolls_over_month_and_year() {
        assert_eq!(
            prefix_to_range("2023-02-28").unwrap(),
            ("2023-02-28".to_string(), "2023-03-01".to_string())
        );
        assert_eq!(
            prefix_to_range("2024-02-28").unwrap(),
            ("2024-02-28".to_string(), "2024-02-29".to_string())
        );
        assert_eq!(
            prefix_to_range("2023-12-31").unwrap(),
            ("2023-12-31".to_string(), "2024-01-01".to_string())
        );
    }

    #[test]
    fn test_invalid_prefixes() {
        assert!(matches!(prefix_to_range("2023/01"), Err(Error::Validation(_))));
        assert!(matches!(prefix_to_range("2023-13"), Err(Error::Validation(_))));
        assert!(matches!(prefix_to_range("2023-02-30"), Err(Error::Validation(_))));
        assert!(matches!(prefix_to_range(""), Err(Error::Validation(_))));
    }
}
