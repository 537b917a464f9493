//! Database schema definitions

/// SQL to create the entries table
pub const CREATE_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY,
    authors TEXT NOT NULL,
    title TEXT NOT NULL,
    venue TEXT,
    year INTEGER,
    publication_date TEXT,
    volume TEXT,
    number TEXT,
    pages TEXT,
    doi TEXT,
    url TEXT,
    tags TEXT,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the reference sets table
pub const CREATE_REFSETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS refsets (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the set membership table
/// Both foreign keys cascade, so deleting either owner drops the link
pub const CREATE_SET_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS set_entries (
    set_id INTEGER NOT NULL,
    entry_id INTEGER NOT NULL,
    PRIMARY KEY (set_id, entry_id),
    FOREIGN KEY (set_id) REFERENCES refsets(id) ON DELETE CASCADE,
    FOREIGN KEY (entry_id) REFERENCES entries(id) ON DELETE CASCADE
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_entries_created ON entries(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_set_entries_entry ON set_entries(entry_id)",
];

/// Columns added after the first release: (table, column, type).
/// Applied with `ALTER TABLE ... ADD COLUMN` when missing.
pub const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[
    ("entries", "publication_date", "TEXT"),
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_ENTRIES_TABLE,
        CREATE_REFSETS_TABLE,
        CREATE_SET_ENTRIES_TABLE,
    ]
}
