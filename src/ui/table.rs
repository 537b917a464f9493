use crate::entry::EntrySummary;
use crate::refset::ReferenceSet;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Authors")]
    pub authors: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Venue")]
    pub venue: String,
    #[tabled(rename = "Year")]
    pub year: String,
    #[tabled(rename = "Published")]
    pub publication_date: String,
    #[tabled(rename = "Tags")]
    pub tags: String,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&EntrySummary> for EntryRow {
    fn from(e: &EntrySummary) -> Self {
        Self {
            id: e.id,
            authors: truncate(&e.authors, 32),
            title: truncate(&e.title, 48),
            venue: e.venue.clone().unwrap_or_default(),
            year: e.year.map(|y| y.to_string()).unwrap_or_default(),
            publication_date: e.publication_date.clone().unwrap_or_default(),
            tags: e.tags.clone().unwrap_or_default(),
            // Date part is enough in a listing
            created_at: e.created_at.chars().take(10).collect(),
        }
    }
}

#[derive(Tabled)]
pub struct RefSetRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

pub fn entries_table(entries: &[EntrySummary]) -> String {
    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn refsets_table(sets: &[ReferenceSet]) -> String {
    let rows: Vec<RefSetRow> = sets
        .iter()
        .map(|s| RefSetRow {
            id: s.id,
            name: s.name.clone(),
            created_at: s.created_at.chars().take(10).collect(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
