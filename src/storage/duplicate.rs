//! Duplicate guard for entries
//!
//! Two entries collide when their `(title, authors, publication_date)` are
//! equal after normalization: text is trimmed and lower-cased, a missing
//! publication date counts as the empty string. The schema cannot express
//! this (nullable column, case variants), so writes consult the guard first.

use rusqlite::{Connection, OptionalExtension, params};
use crate::Result;

/// Normalize authors or title for comparison
pub fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize a publication date for comparison
pub fn normalize_publication_date(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_string()
}

/// Find a persisted entry that collides with the prospective values.
///
/// `exclude_id` removes one row from consideration, used when an entry is
/// checked against everything but itself during an update.
pub fn find_duplicate(
    conn: &Connection,
    authors: &str,
    title: &str,
    publication_date: Option<&str>,
    exclude_id: Option<i64>,
) -> Result<Option<i64>> {
    let title = normalize_text(title);
    let authors = normalize_text(authors);
    let publication_date = normalize_publication_date(publication_date);

    // `lower` in SQLite folds ASCII only, so fold rows in Rust when the
    // prospective values carry non-ASCII text
    if !(title.is_ascii() && authors.is_ascii()) {
        return find_duplicate_unicode(conn, &authors, &title, &publication_date, exclude_id);
    }

    conn.query_row(
        r#"
        SELECT id FROM entries
        WHERE lower(trim(title)) = ?1
          AND lower(trim(authors)) = ?2
          AND ifnull(trim(publication_date), '') = ?3
          AND (?4 IS NULL OR id <> ?4)
        ORDER BY id
        LIMIT 1
        "#,
        params![title, authors, publication_date, exclude_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

fn find_duplicate_unicode(
    conn: &Connection,
    authors: &str,
    title: &str,
    publication_date: &str,
    exclude_id: Option<i64>,
) -> Result<Option<i64>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, title, authors FROM entries
        WHERE ifnull(trim(publication_date), '') = ?1
          AND (?2 IS NULL OR id <> ?2)
        ORDER BY id
        "#,
    )?;

    let rows = stmt.query_map(params![publication_date, exclude_id], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
    })?;

    for row in rows {
        let (id, row_title, row_authors) = row?;
        if normalize_text(&row_title) == title && normalize_text(&row_authors) == authors {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
