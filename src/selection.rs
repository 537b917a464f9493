//! Selection context owned by the presentation layer
//!
//! Front ends track which entry and which reference set the user has picked
//! in a `Selection` value and pass it into the calls below, instead of
//! keeping "currently selected" ids in shared mutable state.

use crate::storage::BibStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub entry_id: Option<i64>,
    pub set_id: Option<i64>,
}

impl Selection {
    pub fn new(entry_id: Option<i64>, set_id: Option<i64>) -> Self {
        Self { entry_id, set_id }
    }

    pub fn with_entry(mut self, entry_id: i64) -> Self {
        self.entry_id = Some(entry_id);
        self
    }

    pub fn with_set(mut self, set_id: i64) -> Self {
        self.set_id = Some(set_id);
        self
    }

    /// Drop the entry selection, e.g. after the entry was deleted
    pub fn clear_entry(&mut self) {
        self.entry_id = None;
    }

    /// Drop the set selection, e.g. after the set was deleted
    pub fn clear_set(&mut self) {
        self.set_id = None;
    }

    pub fn require_entry(&self) -> Result<i64> {
        self.entry_id
            .ok_or_else(|| Error::validation("Select an entry first"))
    }

    pub fn require_set(&self) -> Result<i64> {
        self.set_id.ok_or_else(|| Error::validation("Select a set first"))
    }
}

/// Add the selected entry to the selected set
pub fn add_selected_to_set(store: &BibStore, selection: &Selection) -> Result<()> {
    let entry_id = selection.require_entry()?;
    let set_id = selection.require_set()?;
    store.add_entry_to_set(set_id, entry_id)
}

/// Remove the selected entry from the selected set
pub fn remove_selected_from_set(store: &BibStore, selection: &Selection) -> Result<()> {
    let entry_id = selection.require_entry()?;
    let set_id = selection.require_set()?;
    store.remove_entry_from_set(set_id, entry_id)
}

/// Delete the selected entry and clear the selection
pub fn delete_selected_entry(store: &BibStore, selection: &mut Selection) -> Result<()> {
    let entry_id = selection.require_entry()?;
    store.delete_entry(entry_id)?;
    selection.clear_entry();
    Ok(())
}

/// Delete the selected set and clear the selection
pub fn delete_selected_set(store: &BibStore, selection: &mut Selection) -> Result<()> {
    let set_id = selection.require_set()?;
    store.delete_refset(set_id)?;
    selection.clear_set();
    Ok(())
}
