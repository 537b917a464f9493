use crate::{EntryFields, FindArgs};
use bibshelf::config::{self, BibshelfConfig};
use bibshelf::entry::parse_year;
use bibshelf::storage::BibStore;
use bibshelf::ui::{self, Icons};
use bibshelf::{
    AdvancedSearch, EntryPatch, EntrySummary, NewEntry, Selection, entry_to_bibtex, export_refset,
    parse_search, selection,
};
use std::path::{Path, PathBuf};

pub fn run_init(
    store: &BibStore,
    config_path: &Path,
    settings: &BibshelfConfig,
    database: &Path,
    force: bool,
) -> anyhow::Result<()> {
    let settings = BibshelfConfig {
        database: Some(database.to_string_lossy().to_string()),
        ..settings.clone()
    };
    config::write_config(config_path, &settings, force)?;

    ui::success(&format!("Wrote config to {}", config_path.display()));
    ui::info("Database", &database.display().to_string());
    ui::info("Entries", &store.count_entries()?.to_string());
    Ok(())
}

pub fn run_add(store: &BibStore, fields: EntryFields, json: bool) -> anyhow::Result<()> {
    let entry = new_entry_from_fields(fields)?;
    let id = store.add_entry(&entry)?;

    if json {
        println!("{}", serde_json::json!({ "id": id }));
    } else {
        ui::success(&format!("Entry added with id {}", id));
    }
    Ok(())
}

pub fn run_update(store: &BibStore, id: i64, fields: EntryFields) -> anyhow::Result<()> {
    let patch = patch_from_fields(fields)?;
    if patch.is_empty() {
        ui::warn("Nothing to update: no fields given");
        return Ok(());
    }
    store.update_entry(id, &patch)?;
    ui::success(&format!("Entry {} updated", id));
    Ok(())
}

pub fn run_delete(store: &BibStore, id: i64, yes: bool) -> anyhow::Result<()> {
    let mut selection = Selection::default().with_entry(id);
    if !yes && !confirm(&format!("Delete entry {}?", id))? {
        ui::warn("Aborted");
        return Ok(());
    }
    selection::delete_selected_entry(store, &mut selection)?;
    ui::success(&format!("Entry {} deleted", id));
    Ok(())
}

pub fn run_show(store: &BibStore, id: i64, bibtex: bool, json: bool) -> anyhow::Result<()> {
    let Some(entry) = store.get_entry(id)? else {
        anyhow::bail!("Entry {} not found", id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else if bibtex {
        println!("{}", entry_to_bibtex(&entry, None));
    } else {
        ui::entry_details(&entry);
    }
    Ok(())
}

pub fn run_list(store: &BibStore, json: bool) -> anyhow::Result<()> {
    let entries = store.list_entries(None)?;
    print_entries(&entries, json, "No entries yet.")
}

pub fn run_search(store: &BibStore, query: &str, json: bool) -> anyhow::Result<()> {
    let filter = parse_search(query);
    tracing::debug!("Search {:?} -> {:?}", query, filter);
    if !json {
        println!("{} Searching for: '{}'", Icons::SEARCH, query.trim());
    }
    let entries = store.list_entries(filter.as_ref())?;
    print_entries(&entries, json, "No entries found.")
}

pub fn run_find(store: &BibStore, criteria: FindArgs, json: bool) -> anyhow::Result<()> {
    let search = AdvancedSearch {
        text: criteria.text,
        tag: criteria.tag,
        author: criteria.author,
        created_from: criteria.created_from,
        created_to: criteria.created_to,
        pub_from: criteria.pub_from,
        pub_to: criteria.pub_to,
    };
    let filter = search.to_filter()?;
    let entries = store.list_entries(filter.as_ref())?;
    print_entries(&entries, json, "No entries found.")
}

pub fn run_set_create(store: &BibStore, name: &str, json: bool) -> anyhow::Result<()> {
    let id = store.create_refset(name)?;
    if json {
        println!("{}", serde_json::json!({ "id": id, "name": name.trim() }));
    } else {
        ui::success(&format!("Reference set created: {} (id {})", name.trim(), id));
    }
    Ok(())
}

pub fn run_set_delete(store: &BibStore, set: &str, yes: bool) -> anyhow::Result<()> {
    let set_id = resolve_set(store, set)?;
    let mut selection = Selection::default().with_set(set_id);
    if !yes && !confirm(&format!("Delete set {}?", set))? {
        ui::warn("Aborted");
        return Ok(());
    }
    selection::delete_selected_set(store, &mut selection)?;
    ui::success(&format!("Reference set {} deleted", set));
    Ok(())
}

pub fn run_set_list(store: &BibStore, json: bool) -> anyhow::Result<()> {
    let sets = store.list_refsets()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&sets)?);
    } else if sets.is_empty() {
        ui::empty("No reference sets yet.");
    } else {
        println!("{}", ui::refsets_table(&sets));
    }
    Ok(())
}

pub fn run_set_add(store: &BibStore, set: &str, entry: i64) -> anyhow::Result<()> {
    let selection = Selection::new(Some(entry), Some(resolve_set(store, set)?));
    if store.get_entry(entry)?.is_none() {
        ui::warn(&format!("Entry {} does not exist; nothing added", entry));
        return Ok(());
    }
    selection::add_selected_to_set(store, &selection)?;
    ui::success(&format!("{} Entry {} added to set {}", Icons::LINK, entry, set));
    Ok(())
}

pub fn run_set_remove(store: &BibStore, set: &str, entry: i64) -> anyhow::Result<()> {
    let selection = Selection::new(Some(entry), Some(resolve_set(store, set)?));
    selection::remove_selected_from_set(store, &selection)?;
    ui::success(&format!("Entry {} removed from set {}", entry, set));
    Ok(())
}

pub fn run_set_show(store: &BibStore, set: &str, json: bool) -> anyhow::Result<()> {
    let set_id = resolve_set(store, set)?;
    let entries = store.list_entries_in_set(set_id)?;
    if !json {
        ui::header(&format!("{} {}", Icons::FOLDER, set));
    }
    print_entries(&entries, json, "Set is empty.")
}

pub fn run_set_export(
    store: &BibStore,
    settings: &BibshelfConfig,
    set: &str,
    output: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let set_id = resolve_set(store, set)?;
    let name = store
        .get_refset(set_id)?
        .map(|s| s.name)
        .unwrap_or_else(|| set.to_string());

    if store.list_entries_in_set(set_id)?.is_empty() {
        ui::warn("Set is empty; nothing exported");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| settings.export_path_for(&name));
    config::ensure_db_dir(&path)?;
    let count = export_refset(store, set_id, &path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "set": name, "entries": count, "path": path.display().to_string() })
        );
    } else {
        ui::success(&format!(
            "{} Exported {} entries to {}",
            Icons::EXPORT,
            count,
            path.display()
        ));
    }
    Ok(())
}

pub fn run_stats(store: &BibStore, database: &Path, json: bool) -> anyhow::Result<()> {
    let stats = store.stats()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} Bibshelf Statistics ({})",
        Icons::STATS,
        ui::dim(&database.display().to_string())
    );
    println!(
        "{}",
        ui::stats_table(&[
            ("Entries", &stats.entries.to_string()),
            ("Reference sets", &stats.refsets.to_string()),
            ("Memberships", &stats.memberships.to_string()),
        ])
    );
    Ok(())
}

fn print_entries(entries: &[EntrySummary], json: bool, empty_message: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
    } else if entries.is_empty() {
        ui::empty(empty_message);
    } else {
        println!("{}", ui::entries_table(entries));
        println!("{}", ui::dim(&format!("{} entries", entries.len())));
    }
    Ok(())
}

/// A set argument is an exact name, or an id when no set has that name
fn resolve_set(store: &BibStore, set: &str) -> anyhow::Result<i64> {
    if let Some(id) = store.find_refset_by_name(set)? {
        return Ok(id);
    }
    if let Ok(id) = set.trim().parse::<i64>() {
        if store.get_refset(id)?.is_some() {
            return Ok(id);
        }
    }
    anyhow::bail!("No reference set named or numbered '{}'", set)
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let term = console::Term::stderr();
    term.write_str(&format!("{} {} [y/N] ", Icons::WARN, prompt))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn new_entry_from_fields(fields: EntryFields) -> anyhow::Result<NewEntry> {
    let year = match fields.year.as_deref().map(str::trim) {
        Some(y) if !y.is_empty() => Some(parse_year(y)?),
        _ => None,
    };

    Ok(NewEntry {
        authors: fields.authors.unwrap_or_default(),
        title: fields.title.unwrap_or_default(),
        venue: fields.venue,
        year,
        publication_date: fields.publication_date,
        volume: fields.volume,
        number: fields.number,
        pages: fields.pages,
        doi: fields.doi,
        url: fields.url,
        tags: fields.tags,
    })
}

fn patch_from_fields(fields: EntryFields) -> anyhow::Result<EntryPatch> {
    let year = match fields.year.as_deref().map(str::trim) {
        Some("") => Some(None),
        Some(y) => Some(Some(parse_year(y)?)),
        None => None,
    };

    Ok(EntryPatch {
        authors: fields.authors,
        title: fields.title,
        venue: fields.venue.map(Some),
        year,
        publication_date: fields.publication_date.map(Some),
        volume: fields.volume.map(Some),
        number: fields.number.map(Some),
        pages: fields.pages.map(Some),
        doi: fields.doi.map(Some),
        url: fields.url.map(Some),
        tags: fields.tags.map(Some),
    })
}
