//! Property tests for search and pick-list reconciliation invariants.

use proptest::prelude::*;

use sitestock::{
    apply_edit, build_checked_map, build_vocabulary, filter_by_facets, matches, merge,
    parse_item_name, remove, toggle, CatalogItem, FacetQuery, ItemKey, SelectionEntry,
};

fn arb_item() -> impl Strategy<Value = CatalogItem> {
    (
        "[A-D]{1,2}",
        prop::sample::select(vec!["", "0", "1", "2", " "]),
        "[a-z0-9 ]{0,24}",
    )
        .prop_map(|(code, sub, name)| CatalogItem::new(&code, sub, &name))
}

fn arb_items() -> impl Strategy<Value = Vec<CatalogItem>> {
    prop::collection::vec(arb_item(), 0..12)
}

fn arb_entries() -> impl Strategy<Value = Vec<SelectionEntry>> {
    prop::collection::vec(arb_item().prop_map(SelectionEntry::from), 0..8)
}

/// Selection without duplicate keys, as the reconciler maintains it.
fn unique(entries: Vec<SelectionEntry>) -> Vec<SelectionEntry> {
    sitestock::selection::add_entries(&[], &entries)
}

proptest! {
    #[test]
    fn merge_is_idempotent(stored in arb_items(), pre in arb_entries()) {
        let once = merge(&stored, &pre);
        let twice = merge(&once, &pre);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_keeps_stored_prefix(stored in arb_items(), pre in arb_entries()) {
        let merged = merge(&stored, &pre);
        prop_assert_eq!(&merged[..stored.len()], &stored[..]);
    }

    #[test]
    fn checked_map_covers_merged(stored in arb_items(), pre in arb_entries()) {
        let merged = merge(&stored, &pre);
        let map = build_checked_map(&merged, &pre);
        for item in &merged {
            let expected = pre.iter().any(|e| e.key() == item.key());
            prop_assert_eq!(map.get(&item.key()), Some(expected));
        }
    }

    #[test]
    fn blank_facet_query_keeps_everything(items in arb_items()) {
        let vocab = build_vocabulary(&items);
        let out = filter_by_facets(&items, &FacetQuery::default(), |i| {
            parse_item_name(&i.item_name, &vocab)
        });
        prop_assert_eq!(out, items);
    }

    #[test]
    fn parsing_is_deterministic(items in arb_items()) {
        let vocab = build_vocabulary(&items);
        for item in &items {
            prop_assert_eq!(
                parse_item_name(&item.item_name, &vocab),
                parse_item_name(&item.item_name, &vocab)
            );
        }
    }

    #[test]
    fn reordered_words_still_match(words in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        let field = words.join(" ");
        let query: Vec<&str> = words.iter().rev().map(String::as_str).collect();
        prop_assert!(matches(&field, &query.join(" ")));
    }

    #[test]
    fn edit_replaces_only_its_entry(
        entries in arb_entries(),
        pick in any::<prop::sample::Index>(),
        qty in "[1-9][0-9]{0,2}",
    ) {
        let selection = unique(entries);
        prop_assume!(!selection.is_empty());
        let i = pick.index(selection.len());
        let mut edited = selection[i].clone();
        edited.edits.qty = qty;

        let next = apply_edit(&selection, &edited);
        prop_assert_eq!(next.len(), selection.len());
        for (j, entry) in next.iter().enumerate() {
            if j == i {
                prop_assert_eq!(entry, &edited);
            } else {
                prop_assert_eq!(entry, &selection[j]);
            }
        }
    }

    #[test]
    fn removing_unknown_key_is_noop(entries in arb_entries()) {
        let selection = unique(entries);
        let absent = ItemKey::new("ZZZ", "99");
        prop_assert_eq!(remove(&selection, &absent), selection);
    }

    #[test]
    fn double_toggle_restores(stored in arb_items(), pre in arb_entries()) {
        let merged = merge(&stored, &pre);
        let map = build_checked_map(&merged, &pre);
        for item in &merged {
            let key = item.key();
            prop_assert_eq!(toggle(&toggle(&map, &key), &key), map.clone());
        }
    }
}
