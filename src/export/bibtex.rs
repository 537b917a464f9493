//! BibTeX rendering for single entries

use crate::entry::Entry;

/// `@article` when a venue is present, `@misc` otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BibtexType {
    Article,
    Misc,
}

impl BibtexType {
    pub fn for_entry(entry: &Entry) -> Self {
        match entry.venue.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => BibtexType::Article,
            _ => BibtexType::Misc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BibtexType::Article => "article",
            BibtexType::Misc => "misc",
        }
    }
}

/// Escape backslashes, braces and percent signs
pub fn escape_bibtex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '%' => out.push_str("\\%"),
            _ => out.push(c),
        }
    }
    out
}

/// Citation key: family name + year (or `n.d.`) + first six title letters, lower-cased.
pub fn cite_key(entry: &Entry) -> String {
    let family = family_name(&entry.authors).unwrap_or_else(|| "anon".to_string());
    let year = entry
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "n.d.".to_string());
    let letters: String = entry.title.chars().filter(|c| c.is_ascii_alphabetic()).take(6).collect();
    let fragment = if letters.is_empty() { "untitled".to_string() } else { letters };

    format!("{}{}{}", family, year, fragment).to_lowercase()
}

/// Family name of the first author.
///
/// The first author ends at ` and ` or `;`. `Family, Given` takes the part
/// before the comma, otherwise the last word. The result is the first run
/// of letters, apostrophes and hyphens.
fn family_name(authors: &str) -> Option<String> {
    let first = authors
        .split(';')
        .next()
        .unwrap_or("")
        .split(" and ")
        .next()
        .unwrap_or("")
        .trim();

    let candidate = match first.split_once(',') {
        Some((family, _)) => family.trim(),
        None => first.split_whitespace().last().unwrap_or(""),
    };

    let run: String = candidate
        .chars()
        .skip_while(|c| !is_name_char(*c))
        .take_while(|c| is_name_char(*c))
        .collect();

    if run.is_empty() { None } else { Some(run) }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '\'' || c == '-'
}

/// Render an entry as a BibTeX block; `key` overrides the generated key.
pub fn entry_to_bibtex(entry: &Entry, key: Option<&str>) -> String {
    let key = key.map(str::to_string).unwrap_or_else(|| cite_key(entry));
    let year = entry.year.map(|y| y.to_string());

    let fields: [(&str, Option<&str>); 10] = [
        ("author", Some(entry.authors.as_str())),
        ("title", Some(entry.title.as_str())),
        ("journal", entry.venue.as_deref()),
        ("year", year.as_deref()),
        ("date", entry.publication_date.as_deref()),
        ("volume", entry.volume.as_deref()),
        ("number", entry.number.as_deref()),
        ("pages", entry.pages.as_deref()),
        ("doi", entry.doi.as_deref()),
        ("url", entry.url.as_deref()),
    ];
    let present: Vec<(&str, &str)> = fields
        .iter()
        .filter_map(|(name, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (*name, v)))
        .collect();

    let mut lines = vec![format!("@{}{{{},", BibtexType::for_entry(entry).as_str(), key)];
    for (i, (name, value)) in present.iter().enumerate() {
        let comma = if i + 1 < present.len() { "," } else { "" };
        lines.push(format!("  {} = {{{}}}{}", name, escape_bibtex(value), comma));
    }
    lines.push("}".to_string());
    lines.join("\n")
}
