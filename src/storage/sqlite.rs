//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use rusqlite::types::Value;
use serde::Serialize;
use crate::{Error, Result};
use crate::entry::{Entry, EntryPatch, EntrySummary, NewEntry};
use crate::query::Filter;
use crate::refset::{self, ReferenceSet};
use super::duplicate::find_duplicate;
use super::predicate::Predicate;
use super::schema;

const SUMMARY_COLUMNS: &str = "id, authors, title, venue, year, publication_date, tags, created_at";

const ENTRY_COLUMNS: &str =
    "id, authors, title, venue, year, publication_date, volume, number, pages, doi, url, tags, created_at";

/// SQLite-backed storage for entries, reference sets and their memberships
pub struct BibStore {
    conn: Connection,
}

impl BibStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        tracing::debug!("Opened bibliography store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Close the underlying connection, surfacing any error
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Enable cascades, create tables, apply additive migrations, then indexes
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        self.migrate_columns()?;
        for stmt in schema::CREATE_INDEXES {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    fn migrate_columns(&self) -> Result<()> {
        for (table, column, ty) in schema::ADDITIVE_COLUMNS {
            let existing = self.table_columns(table)?;
            if !existing.iter().any(|c| c == column) {
                tracing::info!("Migrating schema: adding {}.{}", table, column);
                self.conn
                    .execute(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, ty), [])?;
            }
        }
        Ok(())
    }

    fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }

    // ========== Entry Operations ==========

    /// Add a new entry and return its id.
    ///
    /// Fails with `Validation` on missing/malformed fields and with
    /// `DuplicateEntry` when a normalized twin already exists.
    pub fn add_entry(&self, entry: &NewEntry) -> Result<i64> {
        let entry = entry.normalized()?;

        if let Some(id) = find_duplicate(
            &self.conn,
            &entry.authors,
            &entry.title,
            entry.publication_date.as_deref(),
            None,
        )? {
            return Err(Error::DuplicateEntry { id });
        }

        self.conn.execute(
            r#"
            INSERT INTO entries (authors, title, venue, year, publication_date, volume, number, pages, doi, url, tags, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                entry.authors,
                entry.title,
                entry.venue,
                entry.year,
                entry.publication_date,
                entry.volume,
                entry.number,
                entry.pages,
                entry.doi,
                entry.url,
                entry.tags,
                now_iso(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!("Added entry {} ({})", id, entry.title);
        Ok(id)
    }

    /// Apply a partial update. An empty patch does nothing.
    ///
    /// The duplicate check runs on the merged `(authors, title,
    /// publication_date)`, excluding the entry itself. Only supplied
    /// columns are written.
    pub fn update_entry(&self, id: i64, patch: &EntryPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let patch = patch.normalized()?;

        let current: Option<(String, String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT authors, title, publication_date FROM entries WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let (cur_authors, cur_title, cur_pubdate) = current.ok_or(Error::EntryNotFound(id))?;

        let authors = patch.authors.as_deref().unwrap_or(&cur_authors);
        let title = patch.title.as_deref().unwrap_or(&cur_title);
        let pubdate = match &patch.publication_date {
            Some(date) => date.as_deref(),
            None => cur_pubdate.as_deref(),
        };

        if let Some(dup) = find_duplicate(&self.conn, authors, title, pubdate, Some(id))? {
            return Err(Error::DuplicateEntry { id: dup });
        }

        let assignments = patch_assignments(&patch);
        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let mut values: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
        values.push(Value::Integer(id));

        self.conn.execute(
            &format!("UPDATE entries SET {} WHERE id = ?", set_clause),
            params_from_iter(values.iter()),
        )?;
        tracing::debug!("Updated entry {}", id);
        Ok(())
    }

    /// Delete an entry; memberships go with it. Missing ids are fine.
    pub fn delete_entry(&self, id: i64) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;
        tracing::debug!("Deleted entry {} ({} row(s))", id, removed);
        Ok(())
    }

    /// List entry summaries, newest first, optionally filtered
    pub fn list_entries(&self, filter: Option<&Filter>) -> Result<Vec<EntrySummary>> {
        let mut sql = format!("SELECT {} FROM entries", SUMMARY_COLUMNS);
        let mut values = Vec::new();
        if let Some(filter) = filter {
            let predicate = Predicate::compile(filter);
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.sql);
            values = predicate.params;
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params_from_iter(values.iter()), |row| self.row_to_summary(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Get a full entry by id
    pub fn get_entry(&self, id: i64) -> Result<Option<Entry>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
                [id],
                |row| self.row_to_entry(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all entries
    pub fn count_entries(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn entry_exists(&self, id: i64) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT id FROM entries WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// Helper to convert a row to an EntrySummary
    fn row_to_summary(&self, row: &rusqlite::Row) -> rusqlite::Result<EntrySummary> {
        Ok(EntrySummary {
            id: row.get(0)?,
            authors: row.get(1)?,
            title: row.get(2)?,
            venue: row.get(3)?,
            year: row.get(4)?,
            publication_date: row.get(5)?,
            tags: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    /// Helper to convert a row to an Entry
    fn row_to_entry(&self, row: &rusqlite::Row) -> rusqlite::Result<Entry> {
        Ok(Entry {
            id: row.get(0)?,
            authors: row.get(1)?,
            title: row.get(2)?,
            venue: row.get(3)?,
            year: row.get(4)?,
            publication_date: row.get(5)?,
            volume: row.get(6)?,
            number: row.get(7)?,
            pages: row.get(8)?,
            doi: row.get(9)?,
            url: row.get(10)?,
            tags: row.get(11)?,
            created_at: row.get(12)?,
        })
    }

    // ========== Reference Set Operations ==========

    /// Create a reference set and return its id
    pub fn create_refset(&self, name: &str) -> Result<i64> {
        let name = refset::normalize_name(name)?;
        if let Some(id) = self.find_refset_by_name(name)? {
            return Err(Error::DuplicateRefSet { id, name: name.to_string() });
        }

        self.conn.execute(
            "INSERT INTO refsets (name, created_at) VALUES (?1, ?2)",
            params![name, now_iso()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!("Created reference set {} ({})", id, name);
        Ok(id)
    }

    /// Delete a reference set and every membership link pointing at it
    pub fn delete_refset(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM refsets WHERE id = ?1", [id])?;
        // Cascade already covers this when foreign keys are on
        tx.execute("DELETE FROM set_entries WHERE set_id = ?1", [id])?;
        tx.commit()?;
        tracing::debug!("Deleted reference set {}", id);
        Ok(())
    }

    /// List reference sets sorted by name
    pub fn list_refsets(&self) -> Result<Vec<ReferenceSet>> {
        let mut stmt = self.conn.prepare("SELECT id, name, created_at FROM refsets ORDER BY name")?;
        let sets = stmt
            .query_map([], |row| self.row_to_refset(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sets)
    }

    /// Get a reference set by id
    pub fn get_refset(&self, id: i64) -> Result<Option<ReferenceSet>> {
        self.conn
            .query_row(
                "SELECT id, name, created_at FROM refsets WHERE id = ?1",
                [id],
                |row| self.row_to_refset(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Look up a reference set id by exact (trimmed) name
    pub fn find_refset_by_name(&self, name: &str) -> Result<Option<i64>> {
        self.conn
            .query_row("SELECT id FROM refsets WHERE name = ?1", [name.trim()], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }

    /// Count all reference sets
    pub fn count_refsets(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM refsets", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a ReferenceSet
    fn row_to_refset(&self, row: &rusqlite::Row) -> rusqlite::Result<ReferenceSet> {
        Ok(ReferenceSet {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    // ========== Membership Operations ==========

    /// Link an entry into a set.
    ///
    /// Idempotent: an existing link, or an unknown set or entry id, leaves
    /// the store unchanged and is not an error.
    pub fn add_entry_to_set(&self, set_id: i64, entry_id: i64) -> Result<()> {
        if self.get_refset(set_id)?.is_none() || !self.entry_exists(entry_id)? {
            tracing::debug!(
                "Ignoring membership ({}, {}): set or entry does not exist",
                set_id,
                entry_id
            );
            return Ok(());
        }

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO set_entries (set_id, entry_id) VALUES (?1, ?2)",
            params![set_id, entry_id],
        )?;
        if inserted == 0 {
            tracing::debug!("Entry {} already in set {}", entry_id, set_id);
        }
        Ok(())
    }

    /// Unlink an entry from a set. Missing links are fine.
    pub fn remove_entry_from_set(&self, set_id: i64, entry_id: i64) -> Result<()> {
        self.conn.execute(
            "DELETE FROM set_entries WHERE set_id = ?1 AND entry_id = ?2",
            params![set_id, entry_id],
        )?;
        Ok(())
    }

    /// List the entries of a set, newest first
    pub fn list_entries_in_set(&self, set_id: i64) -> Result<Vec<EntrySummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT e.id, e.authors, e.title, e.venue, e.year, e.publication_date, e.tags, e.created_at
            FROM entries e
            JOIN set_entries s ON e.id = s.entry_id
            WHERE s.set_id = ?1
            ORDER BY e.created_at DESC, e.id DESC
            "#,
        )?;
        let entries = stmt
            .query_map([set_id], |row| self.row_to_summary(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Count membership links
    pub fn count_memberships(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM set_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            entries: self.count_entries()?,
            refsets: self.count_refsets()?,
            memberships: self.count_memberships()?,
        })
    }
}

/// Column/value pairs for the fields a patch supplies
fn patch_assignments(patch: &EntryPatch) -> Vec<(&'static str, Value)> {
    fn text(v: &Option<String>) -> Value {
        v.clone().map(Value::Text).unwrap_or(Value::Null)
    }

    let mut out = Vec::new();
    if let Some(v) = &patch.authors {
        out.push(("authors", Value::Text(v.clone())));
    }
    if let Some(v) = &patch.title {
        out.push(("title", Value::Text(v.clone())));
    }
    if let Some(v) = &patch.year {
        out.push(("year", v.map(|y| Value::Integer(y as i64)).unwrap_or(Value::Null)));
    }
    let optional_text = [
        ("venue", &patch.venue),
        ("publication_date", &patch.publication_date),
        ("volume", &patch.volume),
        ("number", &patch.number),
        ("pages", &patch.pages),
        ("doi", &patch.doi),
        ("url", &patch.url),
        ("tags", &patch.tags),
    ];
    for (column, value) in optional_text {
        if let Some(v) = value {
            out.push((column, text(v)));
        }
    }
    out
}

/// Current UTC instant as ISO-8601 with microseconds
fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub entries: usize,
    pub refsets: usize,
    pub memberships: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{AdvancedSearch, parse_search};

    fn sample_entry(authors: &str, title: &str) -> NewEntry {
        NewEntry::new(authors, title)
    }

    #[test]
    fn test_add_entry_returns_fresh_ids() {
        let store = BibStore::open_in_memory().unwrap();

        let a = store.add_entry(&sample_entry("Doe, J.", "First Entry")).unwrap();
        let b = store.add_entry(&sample_entry("Smith, A.", "Second Entry")).unwrap();

        assert!(a > 0);
        assert!(b > 0);
        assert_ne!(a, b);
        assert_eq!(store.count_entries().unwrap(), 2);
    }

    #[test]
    fn test_add_entry_full_record() {
        let store = BibStore::open_in_memory().unwrap();
        let entry = sample_entry("Doe, J.", "Sample Title")
            .with_venue("Sample Venue")
            .with_year(2023)
            .with_volume("12A")
            .with_number("1")
            .with_pages("1-10")
            .with_doi("10.1000/sampledoi")
            .with_url("http://example.com")
            .with_tags("sample, test");

        let id = store.add_entry(&entry).unwrap();
        let stored = store.get_entry(id).unwrap().unwrap();

        assert_eq!(stored.venue.as_deref(), Some("Sample Venue"));
        assert_eq!(stored.year, Some(2023));
        assert_eq!(stored.volume.as_deref(), Some("12A"));
        assert_eq!(stored.tag_list(), vec!["sample", "test"]);
        assert!(!stored.created_at.is_empty());
    }

    #[test]
    fn test_add_entry_validation() {
        let store = BibStore::open_in_memory().unwrap();
        let err = store.add_entry(&sample_entry("", "No Authors")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.count_entries().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let store = BibStore::open_in_memory().unwrap();
        let first = store
            .add_entry(&sample_entry("Doe, J.", "Sample Title").with_publication_date("2023-05"))
            .unwrap();

        let err = store
            .add_entry(&sample_entry("  DOE, J.", "sample title ").with_publication_date("2023-05"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { id } if id == first));
        assert_eq!(err.conflicting_id(), Some(first));

        // Different publication date is a different work
        assert!(store
            .add_entry(&sample_entry("Doe, J.", "Sample Title").with_publication_date("2024"))
            .is_ok());
    }

    #[test]
    fn test_update_entry() {
        let store = BibStore::open_in_memory().unwrap();
        let id = store.add_entry(&sample_entry("Doe, J.", "Draft").with_venue("Old")).unwrap();

        let patch = EntryPatch::new().with_title("Final").with_venue(None).with_year(Some(2021));
        store.update_entry(id, &patch).unwrap();

        let stored = store.get_entry(id).unwrap().unwrap();
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.venue, None);
        assert_eq!(stored.year, Some(2021));
        assert_eq!(stored.authors, "Doe, J.");
    }

    #[test]
    fn test_empty_update_is_noop() {
        let store = BibStore::open_in_memory().unwrap();
        let id = store.add_entry(&sample_entry("Doe, J.", "Stable")).unwrap();
        let before = store.get_entry(id).unwrap();

        store.update_entry(id, &EntryPatch::new()).unwrap();
        assert_eq!(store.get_entry(id).unwrap(), before);

        // Empty patch on a missing id is also a no-op
        store.update_entry(9999, &EntryPatch::new()).unwrap();
    }

    #[test]
    fn test_update_missing_entry() {
        let store = BibStore::open_in_memory().unwrap();
        let err = store
            .update_entry(42, &EntryPatch::new().with_title("Ghost"))
            .unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(42)));
    }

    #[test]
    fn test_update_rejects_duplicate_of_other_entry() {
        let store = BibStore::open_in_memory().unwrap();
        let a = store.add_entry(&sample_entry("Doe, J.", "Alpha")).unwrap();
        let b = store.add_entry(&sample_entry("Doe, J.", "Beta")).unwrap();

        let err = store
            .update_entry(b, &EntryPatch::new().with_title("ALPHA"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { id } if id == a));
        assert_eq!(store.get_entry(b).unwrap().unwrap().title, "Beta");

        // Re-saving an entry's own values is not a conflict
        store
            .update_entry(a, &EntryPatch::new().with_title("Alpha").with_authors("Doe, J."))
            .unwrap();
    }

    #[test]
    fn test_delete_entry_is_idempotent() {
        let store = BibStore::open_in_memory().unwrap();
        let id = store.add_entry(&sample_entry("Doe, J.", "Gone")).unwrap();

        store.delete_entry(id).unwrap();
        store.delete_entry(id).unwrap();
        store.delete_entry(12345).unwrap();
        assert!(store.get_entry(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_entry_cascades_memberships() {
        let store = BibStore::open_in_memory().unwrap();
        let id = store.add_entry(&sample_entry("Doe, J.", "Linked")).unwrap();
        let set = store.create_refset("Reading").unwrap();
        store.add_entry_to_set(set, id).unwrap();
        assert_eq!(store.count_memberships().unwrap(), 1);

        store.delete_entry(id).unwrap();
        assert_eq!(store.count_memberships().unwrap(), 0);
        assert!(store.list_entries_in_set(set).unwrap().is_empty());
    }

    #[test]
    fn test_list_entries_newest_first() {
        let store = BibStore::open_in_memory().unwrap();
        let first = store.add_entry(&sample_entry("A", "One")).unwrap();
        let second = store.add_entry(&sample_entry("B", "Two")).unwrap();

        let listed = store.list_entries(None).unwrap();
        assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![second, first]);
    }

    #[test]
    fn test_tag_search() {
        let store = BibStore::open_in_memory().unwrap();
        let ml = store.add_entry(&sample_entry("A", "Transformers").with_tags("ml, nlp")).unwrap();
        store.add_entry(&sample_entry("B", "Convolutions").with_tags("vision")).unwrap();

        let filter = parse_search("tag:ml").unwrap();
        let found = store.list_entries(Some(&filter)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ml);
    }

    #[test]
    fn test_year_search_matches_both_paths() {
        let store = BibStore::open_in_memory().unwrap();
        let by_year = store.add_entry(&sample_entry("A", "By Year").with_year(2023)).unwrap();
        let by_date = store
            .add_entry(&sample_entry("B", "By Date").with_publication_date("2023-06-01"))
            .unwrap();
        store.add_entry(&sample_entry("C", "Other").with_year(2022)).unwrap();

        let filter = parse_search("2023").unwrap();
        let mut ids: Vec<i64> = store.list_entries(Some(&filter)).unwrap().iter().map(|e| e.id).collect();
        ids.sort();
        assert_eq!(ids, vec![by_year, by_date]);
    }

    /// Titles of the entries a filter returns, sorted
    fn matching_titles(store: &BibStore, filter: Option<&Filter>) -> Vec<String> {
        let mut titles: Vec<String> = store
            .list_entries(filter)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        titles.sort();
        titles
    }

    fn published_store() -> BibStore {
        let store = BibStore::open_in_memory().unwrap();
        for (title, date) in [
            ("a-2019-12-31", Some("2019-12-31")),
            ("b-2020-03", Some("2020-03")),
            ("c-2021-06-30", Some("2021-06-30")),
            ("d-2021-07-01", Some("2021-07-01")),
            ("e-9999-12-31", Some("9999-12-31")),
            ("f-undated", None),
        ] {
            let mut entry = sample_entry("Doe, J.", title);
            entry.publication_date = date.map(str::to_string);
            store.add_entry(&entry).unwrap();
        }
        store
    }

    fn pub_range(from: Option<&str>, to: Option<&str>) -> Option<Filter> {
        AdvancedSearch {
            pub_from: from.map(str::to_string),
            pub_to: to.map(str::to_string),
            ..Default::default()
        }
        .to_filter()
        .unwrap()
    }

    #[test]
    fn test_publication_range_from_and_to() {
        let store = published_store();
        let filter = pub_range(Some("2020"), Some("2021-06"));
        assert_eq!(
            matching_titles(&store, filter.as_ref()),
            vec!["b-2020-03", "c-2021-06-30"]
        );
    }

    #[test]
    fn test_publication_range_from_only_is_open_ended() {
        let store = published_store();
        let filter = pub_range(Some("2021-06-30"), None);
        assert_eq!(
            matching_titles(&store, filter.as_ref()),
            vec!["c-2021-06-30", "d-2021-07-01", "e-9999-12-31"]
        );
    }

    #[test]
    fn test_publication_range_to_only_includes_whole_period() {
        let store = published_store();
        let filter = pub_range(None, Some("2020"));
        assert_eq!(
            matching_titles(&store, filter.as_ref()),
            vec!["a-2019-12-31", "b-2020-03"]
        );
    }

    #[test]
    fn test_publication_range_reaching_year_9999() {
        let store = published_store();
        let dated = vec![
            "a-2019-12-31",
            "b-2020-03",
            "c-2021-06-30",
            "d-2021-07-01",
            "e-9999-12-31",
        ];
        for to in ["9999", "9999-12", "9999-12-31"] {
            let filter = pub_range(None, Some(to));
            assert_eq!(matching_titles(&store, filter.as_ref()), dated, "to {}", to);
        }
        let filter = pub_range(Some("9999-12-31"), Some("9999-12-31"));
        assert_eq!(matching_titles(&store, filter.as_ref()), vec!["e-9999-12-31"]);
    }

    #[test]
    fn test_created_ranges_against_stored_timestamps() {
        let store = BibStore::open_in_memory().unwrap();
        for (title, created) in [
            ("old", "2023-12-31T23:59:59.999999"),
            ("new-year", "2024-01-01T00:00:00.000000"),
            ("may", "2024-05-15T10:30:00.000000"),
        ] {
            let id = store.add_entry(&sample_entry("Doe, J.", title)).unwrap();
            store
                .connection()
                .execute("UPDATE entries SET created_at = ?1 WHERE id = ?2", params![created, id])
                .unwrap();
        }

        let quick = parse_search("created:2024").unwrap();
        assert_eq!(matching_titles(&store, Some(&quick)), vec!["may", "new-year"]);
        let quick = parse_search("created:2023-12-31").unwrap();
        assert_eq!(matching_titles(&store, Some(&quick)), vec!["old"]);

        let to_only = AdvancedSearch {
            created_to: Some("2023".to_string()),
            ..Default::default()
        };
        assert_eq!(matching_titles(&store, to_only.to_filter().unwrap().as_ref()), vec!["old"]);

        let from_only = AdvancedSearch {
            created_from: Some("2024-05".to_string()),
            ..Default::default()
        };
        assert_eq!(matching_titles(&store, from_only.to_filter().unwrap().as_ref()), vec!["may"]);

        let both = AdvancedSearch {
            created_from: Some("2023-12-31".to_string()),
            created_to: Some("2024-01".to_string()),
            ..Default::default()
        };
        assert_eq!(
            matching_titles(&store, both.to_filter().unwrap().as_ref()),
            vec!["new-year", "old"]
        );
    }

    #[test]
    fn test_non_ascii_publication_date_rejected() {
        let store = BibStore::open_in_memory().unwrap();
        let err = store
            .add_entry(&sample_entry("A", "B").with_publication_date("٢٠٢٣"))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.count_entries().unwrap(), 0);
    }

    #[test]
    fn test_text_search_treats_wildcards_literally() {
        let store = BibStore::open_in_memory().unwrap();
        let pct = store.add_entry(&sample_entry("A", "100% Coverage")).unwrap();
        store.add_entry(&sample_entry("B", "1000 Coverage")).unwrap();

        let filter = parse_search("100%").unwrap();
        let found = store.list_entries(Some(&filter)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, pct);
    }

    #[test]
    fn test_refset_crud() {
        let store = BibStore::open_in_memory().unwrap();
        let b = store.create_refset(" Thesis ").unwrap();
        let a = store.create_refset("Archive").unwrap();

        let names: Vec<String> = store.list_refsets().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Archive", "Thesis"]);
        assert_eq!(store.find_refset_by_name("Thesis").unwrap(), Some(b));

        let err = store.create_refset("Thesis").unwrap_err();
        assert!(matches!(err, Error::DuplicateRefSet { id, .. } if id == b));

        let err = store.create_refset("   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        store.delete_refset(a).unwrap();
        assert_eq!(store.count_refsets().unwrap(), 1);
    }

    #[test]
    fn test_deleted_refset_recreated_starts_empty() {
        let store = BibStore::open_in_memory().unwrap();
        let entry = store.add_entry(&sample_entry("A", "Member")).unwrap();
        let set = store.create_refset("Reading").unwrap();
        store.add_entry_to_set(set, entry).unwrap();

        store.delete_refset(set).unwrap();
        assert_eq!(store.count_memberships().unwrap(), 0);

        let again = store.create_refset("Reading").unwrap();
        assert!(store.list_entries_in_set(again).unwrap().is_empty());
        assert!(store.list_entries_in_set(set).unwrap().is_empty());
    }

    #[test]
    fn test_membership_is_idempotent() {
        let store = BibStore::open_in_memory().unwrap();
        let entry = store.add_entry(&sample_entry("A", "Member")).unwrap();
        let set = store.create_refset("Reading").unwrap();

        store.add_entry_to_set(set, entry).unwrap();
        store.add_entry_to_set(set, entry).unwrap();
        assert_eq!(store.list_entries_in_set(set).unwrap().len(), 1);

        // Unknown ids are ignored
        store.add_entry_to_set(set, 999).unwrap();
        store.add_entry_to_set(999, entry).unwrap();
        assert_eq!(store.count_memberships().unwrap(), 1);

        store.remove_entry_from_set(set, entry).unwrap();
        store.remove_entry_from_set(set, entry).unwrap();
        assert!(store.list_entries_in_set(set).unwrap().is_empty());
    }

    #[test]
    fn test_stats() {
        let store = BibStore::open_in_memory().unwrap();
        let entry = store.add_entry(&sample_entry("A", "Counted")).unwrap();
        let set = store.create_refset("Set").unwrap();
        store.add_entry_to_set(set, entry).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.refsets, 1);
        assert_eq!(stats.memberships, 1);
    }

    #[test]
    fn test_legacy_schema_gains_publication_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE entries (
                    id INTEGER PRIMARY KEY,
                    authors TEXT NOT NULL,
                    title TEXT NOT NULL,
                    venue TEXT,
                    year INTEGER,
                    volume TEXT,
                    number TEXT,
                    pages TEXT,
                    doi TEXT,
                    url TEXT,
                    tags TEXT,
                    created_at TEXT NOT NULL
                );
                INSERT INTO entries (authors, title, created_at)
                VALUES ('Lovelace, A.', 'Notes', '2020-01-01T00:00:00');
                "#,
            )
            .unwrap();
        }

        let store = BibStore::open(&path).unwrap();
        let listed = store.list_entries(None).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].publication_date, None);

        let id = store
            .add_entry(&sample_entry("Lovelace, A.", "Notes").with_publication_date("1843"))
            .unwrap();
        assert_eq!(store.get_entry(id).unwrap().unwrap().publication_date.as_deref(), Some("1843"));
    }
}
