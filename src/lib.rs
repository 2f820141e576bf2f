//! Sitestock: material catalog search and pick-list reconciliation for
//! site logistics (requisition, receiving, issuing).
//!
//! Name parsing learns facet vocabularies from a catalog snapshot, search
//! filters the catalog by plain text or per facet, and the selection module
//! keeps pick lists duplicate-free across screens.

pub mod catalog;
pub mod config;
pub mod parse;
pub mod search;
pub mod selection;
pub mod session;

pub use catalog::{CatalogItem, EditFields, ItemKey, SelectionEntry};
pub use config::PickerConfig;
pub use parse::{build_vocabulary, parse_item_name, Facet, ParsedFacets, Vocabulary};
pub use search::{filter_by_facets, filter_plain, matches, FacetQuery, SearchMode, SearchQuery};
pub use selection::{
    apply_edit, build_checked_map, commit_selection, merge, remove, toggle, try_apply_edit,
    CheckedMap,
};
pub use session::PickSession;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber from `config`.
///
/// `RUST_LOG` wins over `config.log_filter`. Returns false if a subscriber was
/// already installed (the host app may have set its own).
pub fn init_tracing(config: &PickerConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);
    if config.log_json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
