//! Export Layer - BibTeX rendering and `.bib` file output

pub mod bibtex;

use std::path::Path;
use crate::Result;
use crate::storage::BibStore;

pub use bibtex::{cite_key, entry_to_bibtex, escape_bibtex, BibtexType};

/// Render every entry of a set as BibTeX, each block followed by a blank line.
///
/// Returns the text and the number of blocks. Entries that disappear between
/// listing and fetching are skipped.
pub fn render_refset(store: &BibStore, set_id: i64) -> Result<(String, usize)> {
    let mut out = String::new();
    let mut count = 0;

    for summary in store.list_entries_in_set(set_id)? {
        match store.get_entry(summary.id)? {
            Some(entry) => {
                out.push_str(&entry_to_bibtex(&entry, None));
                out.push_str("\n\n");
                count += 1;
            }
            None => tracing::debug!("Entry {} vanished before export, skipping", summary.id),
        }
    }

    Ok((out, count))
}

/// Write a set to a UTF-8 `.bib` file and return the number of blocks written
pub fn export_refset(store: &BibStore, set_id: i64, path: &Path) -> Result<usize> {
    let (contents, count) = render_refset(store, set_id)?;
    std::fs::write(path, contents)?;
    tracing::info!("Exported {} entries from set {} to {}", count, set_id, path.display());
    Ok(count)
}
