//! Session-scoped picking context for one screen.
//!
//! Owns the catalog snapshot and everything derived from it. The vocabulary
//! and parsed-facet memo are tied to the catalog fingerprint and rebuilt only
//! when a different catalog is loaded. Selection mutations are written back to
//! the attached store; a failed write is logged and the in-memory state kept.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::{CatalogFingerprint, CatalogItem, ItemKey, SelectionEntry};
use crate::config::PickerConfig;
use crate::parse::{build_vocabulary, Facet, FacetCache, ParsedFacets, Vocabulary};
use crate::search::{SearchMode, SearchQuery, VoiceInput};
use crate::selection::{
    self, CheckedMap, MemorySelectionStore, SelectionError, SelectionStore, SqliteSelectionStore,
    StoreError,
};

pub struct PickSession {
    scope: String,
    catalog: Arc<[CatalogItem]>,
    fingerprint: CatalogFingerprint,
    vocabulary: Arc<Vocabulary>,
    facets: FacetCache,
    query: SearchQuery,
    selection: Vec<SelectionEntry>,
    checked: CheckedMap,
    store: Option<Arc<dyn SelectionStore>>,
}

impl PickSession {
    /// Empty session for `scope`, the key its pick list is stored under.
    pub fn new(scope: impl Into<String>, config: &PickerConfig) -> Self {
        let catalog: Arc<[CatalogItem]> = Arc::from(Vec::new());
        Self {
            scope: scope.into(),
            fingerprint: CatalogFingerprint::of(&catalog),
            catalog,
            vocabulary: Arc::new(Vocabulary::default()),
            facets: FacetCache::new(config.parse_cache_capacity),
            query: SearchQuery::with_mode(config.default_search_mode),
            selection: Vec::new(),
            checked: CheckedMap::default(),
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SelectionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Restore the stored pick list, then load `catalog` around it.
    pub fn open(
        scope: impl Into<String>,
        config: &PickerConfig,
        store: Arc<dyn SelectionStore>,
        catalog: Vec<CatalogItem>,
    ) -> Result<Self, StoreError> {
        let mut session = Self::new(scope, config).with_store(store);
        session.restore_selection()?;
        session.load_catalog(catalog);
        Ok(session)
    }

    /// Like [`PickSession::open`], with the store chosen by `config`:
    /// SQLite at `selection_db_path` if set, otherwise in memory.
    pub fn from_config(
        scope: impl Into<String>,
        config: &PickerConfig,
        catalog: Vec<CatalogItem>,
    ) -> Result<Self, StoreError> {
        let store: Arc<dyn SelectionStore> = match &config.selection_db_path {
            Some(path) => Arc::new(SqliteSelectionStore::open(path)?),
            None => Arc::new(MemorySelectionStore::new()),
        };
        Self::open(scope, config, store, catalog)
    }

    /// Replace the in-memory pick list with the stored one.
    /// Call [`PickSession::load_catalog`] afterwards to refresh checkboxes.
    pub fn restore_selection(&mut self) -> Result<usize, StoreError> {
        let Some(store) = &self.store else {
            return Ok(self.selection.len());
        };
        self.selection = store.load(&self.scope)?;
        debug!(scope = %self.scope, entries = self.selection.len(), "selection restored");
        Ok(self.selection.len())
    }

    /// Show `stored` merged with the current pick list.
    ///
    /// Preselected items missing from the snapshot are appended and come up
    /// checked. Derived data is rebuilt only if the merged catalog changed.
    pub fn load_catalog(&mut self, stored: Vec<CatalogItem>) {
        let merged = selection::merge(&stored, &self.selection);
        self.checked = selection::build_checked_map(&merged, &self.selection);
        self.install_catalog(merged);
    }

    fn install_catalog(&mut self, merged: Vec<CatalogItem>) {
        let fingerprint = CatalogFingerprint::of(&merged);
        if fingerprint == self.fingerprint {
            debug!(scope = %self.scope, fingerprint = %fingerprint, "catalog unchanged");
            return;
        }

        let start = Instant::now();
        self.vocabulary = Arc::new(build_vocabulary(&merged));
        self.facets.clear();
        self.fingerprint = fingerprint;
        self.catalog = Arc::from(merged);
        info!(
            scope = %self.scope,
            items = self.catalog.len(),
            fingerprint = %self.fingerprint,
            elapsed_us = start.elapsed().as_micros() as u64,
            "catalog loaded"
        );
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    pub fn fingerprint(&self) -> CatalogFingerprint {
        self.fingerprint
    }

    pub fn vocabulary(&self) -> Arc<Vocabulary> {
        Arc::clone(&self.vocabulary)
    }

    pub fn selection(&self) -> &[SelectionEntry] {
        &self.selection
    }

    pub fn checked(&self) -> &CheckedMap {
        &self.checked
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Facets of `item`, memoized for the current catalog.
    pub fn parsed(&self, item: &CatalogItem) -> ParsedFacets {
        self.facets
            .get_or_parse(&self.fingerprint, &item.item_name, &self.vocabulary)
    }

    // --- search ---

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.query.mode = mode;
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    pub fn set_facet_query(&mut self, facet: Facet, text: impl Into<String>) {
        self.query.facets.set(facet, text);
    }

    pub fn apply_voice(&mut self, input: &VoiceInput) -> bool {
        input.apply_to(&mut self.query)
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Catalog items passing the current query.
    pub fn visible(&self) -> Vec<CatalogItem> {
        let visible = self.query.apply(&self.catalog, |item| self.parsed(item));
        debug!(
            scope = %self.scope,
            mode = ?self.query.mode,
            visible = visible.len(),
            total = self.catalog.len(),
            "catalog filtered"
        );
        visible
    }

    // --- checkboxes ---

    pub fn toggle(&mut self, key: &ItemKey) -> bool {
        self.checked = selection::toggle(&self.checked, key);
        self.checked.is_checked(key)
    }

    pub fn is_checked(&self, key: &ItemKey) -> bool {
        self.checked.is_checked(key)
    }

    // --- pick list edits ---

    /// Pick `entries`. They join the catalog if it lacks them and come up checked.
    pub fn add(&mut self, entries: &[SelectionEntry]) {
        self.selection = selection::add_entries(&self.selection, entries);
        for entry in entries {
            self.checked.set(entry.key(), true);
        }
        let merged = selection::merge(&self.catalog, entries);
        if merged.len() != self.catalog.len() {
            self.install_catalog(merged);
        }
        self.persist();
    }

    /// Save edited fields. Returns false, changing nothing, if the item is not picked.
    pub fn save_edit(&mut self, edited: &SelectionEntry) -> bool {
        self.save_edit_strict(edited).is_ok()
    }

    pub fn save_edit_strict(&mut self, edited: &SelectionEntry) -> Result<(), SelectionError> {
        self.selection = selection::try_apply_edit(&self.selection, edited)?;
        self.persist();
        Ok(())
    }

    /// Drop `key` from the pick list and clear its checkbox.
    pub fn delete(&mut self, key: &ItemKey) {
        self.selection = selection::remove(&self.selection, key);
        self.checked.set(key.clone(), false);
        self.persist();
    }

    /// Commit the checkbox state and return the resulting pick list.
    ///
    /// Picked entries the user unchecked are dropped; the rest keep their
    /// edits, followed by newly checked catalog items.
    pub fn confirm(&mut self) -> Vec<SelectionEntry> {
        let kept = selection::retain_checked(&self.selection, &self.checked);
        self.selection = selection::commit_selection(&kept, &self.checked, &self.catalog);
        self.persist();
        info!(scope = %self.scope, entries = self.selection.len(), "selection confirmed");
        self.selection.clone()
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.scope, &self.selection) {
            warn!(scope = %self.scope, error = %e, "selection write-back failed");
        }
    }
}
