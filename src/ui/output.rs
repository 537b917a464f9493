use crate::entry::Entry;
use crate::export::cite_key;
use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BOOKS, text.style(theme().heading.clone()));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!("{} {}: {}", Icons::INFO, label.style(theme().label.clone()), value);
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().heading.clone()));
}

pub fn empty(label: &str) {
    println!("{} {}", Icons::EMPTY, label.style(theme().faint.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().faint.clone()).to_string()
}

/// Print every populated field of an entry, one per line
pub fn entry_details(entry: &Entry) {
    section(&format!(" #{} {} ", entry.id, cite_key(entry).style(theme().cite_key.clone())));
    let year = entry.year.map(|y| y.to_string());
    let tags = entry.tag_list().join(", ");
    let title = entry.title.style(theme().title.clone()).to_string();
    let rows: [(&str, Option<&str>); 12] = [
        ("Authors", Some(entry.authors.as_str())),
        ("Title", Some(title.as_str())),
        ("Venue", entry.venue.as_deref()),
        ("Year", year.as_deref()),
        ("Published", entry.publication_date.as_deref()),
        ("Volume", entry.volume.as_deref()),
        ("Number", entry.number.as_deref()),
        ("Pages", entry.pages.as_deref()),
        ("DOI", entry.doi.as_deref()),
        ("URL", entry.url.as_deref()),
        ("Tags", Some(tags.as_str()).filter(|t| !t.is_empty())),
        ("Created", Some(entry.created_at.as_str())),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            println!("  {:<10} {}", label.style(theme().label.clone()), value);
        }
    }
}
