//! Pick-list reconciliation.
//! Every function takes its inputs by reference and returns fresh state;
//! persisting the result is up to the caller.

pub mod store;

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::catalog::{CatalogItem, ItemKey, SelectionEntry};

pub use store::{MemorySelectionStore, SelectionStore, SqliteSelectionStore, StoreError};

/// Checkbox state per item. Unknown keys read as unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedMap {
    inner: HashMap<ItemKey, bool>,
}

impl CheckedMap {
    pub fn get(&self, key: &ItemKey) -> Option<bool> {
        self.inner.get(key).copied()
    }

    pub fn is_checked(&self, key: &ItemKey) -> bool {
        self.get(key).unwrap_or(false)
    }

    pub fn set(&mut self, key: ItemKey, checked: bool) {
        self.inner.insert(key, checked);
    }

    /// Keys currently checked.
    pub fn checked_keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.inner.iter().filter(|&(_, &v)| v).map(|(k, _)| k)
    }

    pub fn checked_count(&self) -> usize {
        self.inner.values().filter(|&&v| v).count()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Adds an unchecked entry for every item not yet tracked.
    pub fn ensure_tracked<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        for item in items {
            self.inner.entry(item.key()).or_insert(false);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    NoMatch(ItemKey),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoMatch(key) => write!(f, "no selected material with key {key}"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// `stored` followed by every preselected item whose key is not already present.
pub fn merge(stored: &[CatalogItem], preselected: &[SelectionEntry]) -> Vec<CatalogItem> {
    let mut seen: HashSet<ItemKey> = stored.iter().map(CatalogItem::key).collect();
    let mut merged = stored.to_vec();
    for entry in preselected {
        if seen.insert(entry.key()) {
            merged.push(entry.item.clone());
        }
    }
    debug!(
        stored = stored.len(),
        appended = merged.len() - stored.len(),
        "selection merged into catalog"
    );
    merged
}

/// An entry for every merged item, true iff it is preselected.
pub fn build_checked_map(merged: &[CatalogItem], preselected: &[SelectionEntry]) -> CheckedMap {
    let selected: HashSet<ItemKey> = preselected.iter().map(SelectionEntry::key).collect();
    let mut map = CheckedMap::default();
    for item in merged {
        let key = item.key();
        let checked = selected.contains(&key);
        map.set(key, checked);
    }
    map
}

/// Copy of `map` with `key` flipped. An untracked key becomes checked.
pub fn toggle(map: &CheckedMap, key: &ItemKey) -> CheckedMap {
    let mut next = map.clone();
    let flipped = !map.is_checked(key);
    next.set(key.clone(), flipped);
    next
}

/// Replace the entry sharing `edited`'s key. A miss returns the list unchanged.
pub fn apply_edit(selection: &[SelectionEntry], edited: &SelectionEntry) -> Vec<SelectionEntry> {
    try_apply_edit(selection, edited).unwrap_or_else(|_| selection.to_vec())
}

/// Like [`apply_edit`] but reports a miss.
pub fn try_apply_edit(
    selection: &[SelectionEntry],
    edited: &SelectionEntry,
) -> Result<Vec<SelectionEntry>, SelectionError> {
    let key = edited.key();
    let mut found = false;
    let next = selection
        .iter()
        .map(|entry| {
            if entry.key() == key {
                found = true;
                edited.clone()
            } else {
                entry.clone()
            }
        })
        .collect();
    if found {
        Ok(next)
    } else {
        debug!(key = %key, "edit matched no selected material");
        Err(SelectionError::NoMatch(key))
    }
}

/// `selection` without the entry keyed `key`.
pub fn remove(selection: &[SelectionEntry], key: &ItemKey) -> Vec<SelectionEntry> {
    selection
        .iter()
        .filter(|entry| entry.key() != *key)
        .cloned()
        .collect()
}

/// Append entries not yet in `selection`, keeping the existing ones as they are.
pub fn add_entries(selection: &[SelectionEntry], added: &[SelectionEntry]) -> Vec<SelectionEntry> {
    let mut seen: HashSet<ItemKey> = selection.iter().map(SelectionEntry::key).collect();
    let mut next = selection.to_vec();
    for entry in added {
        if seen.insert(entry.key()) {
            next.push(entry.clone());
        }
    }
    next
}

/// Entries of `selection` whose checkbox is not cleared. Keys the map does
/// not track are kept.
pub fn retain_checked(selection: &[SelectionEntry], checked: &CheckedMap) -> Vec<SelectionEntry> {
    selection
        .iter()
        .filter(|entry| checked.get(&entry.key()).unwrap_or(true))
        .cloned()
        .collect()
}

/// Final pick list when the user confirms.
///
/// The baseline comes first with its edit fields intact, followed by every
/// checked catalog item it does not already hold, in catalog order.
pub fn commit_selection(
    baseline: &[SelectionEntry],
    checked: &CheckedMap,
    full_catalog: &[CatalogItem],
) -> Vec<SelectionEntry> {
    let picked: Vec<SelectionEntry> = full_catalog
        .iter()
        .filter(|item| checked.is_checked(&item.key()))
        .cloned()
        .map(SelectionEntry::from)
        .collect();
    let committed = add_entries(baseline, &picked);
    debug!(
        baseline = baseline.len(),
        committed = committed.len(),
        "selection committed"
    );
    committed
}
