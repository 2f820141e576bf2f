//! Catalog filtering: plain name search or per-facet advanced search.

pub mod voice;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::parse::{Facet, ParsedFacets};

pub use voice::VoiceInput;

/// Whether `query` is covered by `field`.
///
/// Case-insensitive. True on direct containment; otherwise every query word
/// must be a substring of some field word, in any order. Either side empty
/// never matches. Not symmetric: the query may not carry words the field lacks.
pub fn matches(field: &str, query: &str) -> bool {
    let field = field.trim().to_lowercase();
    let query = query.trim().to_lowercase();
    if field.is_empty() || query.is_empty() {
        return false;
    }
    if field.contains(&query) {
        return true;
    }

    let field_words: Vec<&str> = field.split_whitespace().collect();
    query
        .split_whitespace()
        .all(|q| field_words.iter().any(|w| w.contains(q)))
}

/// Per-facet query strings. Blank fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetQuery {
    pub product: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub size: String,
    pub brand: String,
}

impl FacetQuery {
    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::Product => &self.product,
            Facet::Type => &self.kind,
            Facet::Color => &self.color,
            Facet::Size => &self.size,
            Facet::Brand => &self.brand,
        }
    }

    pub fn set(&mut self, facet: Facet, value: impl Into<String>) {
        let slot = match facet {
            Facet::Product => &mut self.product,
            Facet::Type => &mut self.kind,
            Facet::Color => &mut self.color,
            Facet::Size => &mut self.size,
            Facet::Brand => &mut self.brand,
        };
        *slot = value.into();
    }

    /// Facets with a non-blank query value.
    pub fn active(&self) -> impl Iterator<Item = (Facet, &str)> + '_ {
        Facet::ALL
            .into_iter()
            .map(move |f| (f, self.get(f)))
            .filter(|(_, q)| !q.trim().is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.active().next().is_none()
    }

    /// AND over the active facets.
    pub fn accepts(&self, parsed: &ParsedFacets) -> bool {
        self.active().all(|(facet, q)| matches(parsed.get(facet), q))
    }
}

/// Keep the items whose parsed facets satisfy every active facet query.
///
/// `parse` supplies facets per item, typically a memoized parser bound to the
/// current vocabulary. A blank query returns the whole list without parsing.
pub fn filter_by_facets<F>(items: &[CatalogItem], query: &FacetQuery, mut parse: F) -> Vec<CatalogItem>
where
    F: FnMut(&CatalogItem) -> ParsedFacets,
{
    if query.is_blank() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| query.accepts(&parse(*item)))
        .cloned()
        .collect()
}

/// Plain search against the raw item name. A blank query keeps everything.
pub fn filter_plain(items: &[CatalogItem], query: &str) -> Vec<CatalogItem> {
    if query.trim().is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| matches(&item.item_name, query))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Plain,
    Advanced,
}

/// Live search state. Only the part selected by `mode` is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub text: String,
    pub facets: FacetQuery,
}

impl SearchQuery {
    pub fn with_mode(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn apply<F>(&self, items: &[CatalogItem], parse: F) -> Vec<CatalogItem>
    where
        F: FnMut(&CatalogItem) -> ParsedFacets,
    {
        match self.mode {
            SearchMode::Plain => filter_plain(items, &self.text),
            SearchMode::Advanced => filter_by_facets(items, &self.facets, parse),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.facets = FacetQuery::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{build_vocabulary, parse_item_name};

    #[test]
    fn word_order_independent_but_not_symmetric() {
        assert!(matches("Red Heavy Socket", "socket red"));
        assert!(!matches("socket red", "Red Heavy Socket"));
        assert!(matches("socket red heavy", "red socket"));
    }

    #[test]
    fn partial_words_and_case() {
        assert!(matches("Schneider", "SCHNEI"));
        assert!(matches("Copper Earthing Strip", "earth cop"));
        assert!(!matches("Copper Earthing Strip", "earth pvc"));
    }

    #[test]
    fn empty_sides_never_match() {
        assert!(!matches("", "red"));
        assert!(!matches("red", ""));
        assert!(!matches("red", "   "));
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("A1", "", "Red 3 Pole MCB Schneider 32A"),
            CatalogItem::new("A2", "", "Blue 2 Pole MCB Havells 16A"),
            CatalogItem::new("B1", "1", "PVC Conduit Pipe 25mm"),
        ]
    }

    #[test]
    fn blank_facet_query_is_identity() {
        let items = catalog();
        let out = filter_by_facets(&items, &FacetQuery::default(), |_| {
            panic!("blank query must not parse")
        });
        assert_eq!(out, items);
    }

    #[test]
    fn facets_are_anded() {
        let items = catalog();
        let vocab = build_vocabulary(&items);
        let parse = |item: &CatalogItem| parse_item_name(&item.item_name, &vocab);

        let mut query = FacetQuery::default();
        query.set(Facet::Product, "mcb");
        assert_eq!(filter_by_facets(&items, &query, parse).len(), 2);

        query.set(Facet::Brand, "havells");
        let out = filter_by_facets(&items, &query, parse);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].item_code, "A2");

        query.set(Facet::Color, "red");
        assert!(filter_by_facets(&items, &query, parse).is_empty());
    }

    #[test]
    fn size_facet_uses_parsed_size() {
        let items = catalog();
        let vocab = build_vocabulary(&items);
        let mut query = FacetQuery::default();
        query.set(Facet::Size, "25");
        let out = filter_by_facets(&items, &query, |i| parse_item_name(&i.item_name, &vocab));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].item_code, "B1");
    }

    #[test]
    fn plain_mode_matches_raw_name() {
        let items = catalog();
        assert_eq!(filter_plain(&items, ""), items);
        assert_eq!(filter_plain(&items, "pole mcb").len(), 2);
        assert_eq!(filter_plain(&items, "pipe pvc")[0].item_code, "B1");
    }

    #[test]
    fn mode_selects_exactly_one_filter() {
        let items = catalog();
        let vocab = build_vocabulary(&items);
        let mut query = SearchQuery::default();
        query.text = "conduit".into();
        query.facets.set(Facet::Brand, "schneider");

        let plain = query.apply(&items, |i| parse_item_name(&i.item_name, &vocab));
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].item_code, "B1");

        query.mode = SearchMode::Advanced;
        let advanced = query.apply(&items, |i| parse_item_name(&i.item_name, &vocab));
        assert_eq!(advanced.len(), 1);
        assert_eq!(advanced[0].item_code, "A1");
    }
}
