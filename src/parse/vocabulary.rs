//! Per-facet candidate words learned from one catalog snapshot.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::tokenize::{classify, tokenize};
use super::Facet;
use crate::catalog::CatalogItem;

/// Insertion-ordered set of lower-case words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WordSet {
    words: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl WordSet {
    /// Returns false if the word was already present.
    pub fn insert(&mut self, word: &str) -> bool {
        if self.seen.contains(word) {
            return false;
        }
        self.seen.insert(word.to_string());
        self.words.push(word.to_string());
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.seen.contains(word)
    }

    /// Words in first-seen order. This is the scan order used by the name parser.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Candidate words per facet. Size has no vocabulary; it is read with a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub products: WordSet,
    pub types: WordSet,
    pub colors: WordSet,
    pub brands: WordSet,
}

impl Vocabulary {
    /// Word set backing `facet`, or `None` for size.
    pub fn words(&self, facet: Facet) -> Option<&WordSet> {
        match facet {
            Facet::Product => Some(&self.products),
            Facet::Type => Some(&self.types),
            Facet::Color => Some(&self.colors),
            Facet::Brand => Some(&self.brands),
            Facet::Size => None,
        }
    }

    fn words_mut(&mut self, facet: Facet) -> Option<&mut WordSet> {
        match facet {
            Facet::Product => Some(&mut self.products),
            Facet::Type => Some(&mut self.types),
            Facet::Color => Some(&mut self.colors),
            Facet::Brand => Some(&mut self.brands),
            Facet::Size => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
            && self.types.is_empty()
            && self.colors.is_empty()
            && self.brands.is_empty()
    }

    /// Add every significant token of `name`.
    pub fn learn(&mut self, name: &str) {
        for token in tokenize(name) {
            if let Some(set) = self.words_mut(classify(&token)) {
                set.insert(&token);
            }
        }
    }
}

/// Scan the catalog once and sort its name tokens into facet vocabularies.
///
/// Words keep the order in which they are first met (catalog order, then
/// position in the name), which fixes the parser's "first match wins" scan.
pub fn build_vocabulary(catalog: &[CatalogItem]) -> Vocabulary {
    let mut vocab = Vocabulary::default();
    for item in catalog {
        vocab.learn(&item.item_name);
    }
    debug!(
        items = catalog.len(),
        products = vocab.products.len(),
        types = vocab.types.len(),
        colors = vocab.colors.len(),
        brands = vocab.brands.len(),
        "vocabulary_built"
    );
    vocab
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(set: &WordSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn builds_facets_from_sample_name() {
        let catalog = vec![CatalogItem::new("A1", "", "Red 3 Pole MCB Schneider 32A")];
        let vocab = build_vocabulary(&catalog);
        assert_eq!(words(&vocab.colors), vec!["red"]);
        assert_eq!(words(&vocab.types), vec!["pole"]);
        assert_eq!(words(&vocab.brands), vec!["schneider"]);
        assert_eq!(words(&vocab.products), vec!["mcb", "32a"]);
    }

    #[test]
    fn deduplicates_and_keeps_first_seen_order() {
        let catalog = vec![
            CatalogItem::new("A", "1", "Socket Switch"),
            CatalogItem::new("B", "1", "switch plate socket"),
        ];
        let vocab = build_vocabulary(&catalog);
        assert_eq!(words(&vocab.products), vec!["socket", "switch", "plate"]);
    }

    #[test]
    fn empty_catalog_and_blank_names() {
        assert!(build_vocabulary(&[]).is_empty());
        let catalog = vec![CatalogItem::new("A", "", ""), CatalogItem::new("B", "", "12 x")];
        assert!(build_vocabulary(&catalog).is_empty());
    }

    #[test]
    fn size_has_no_word_set() {
        assert!(Vocabulary::default().words(Facet::Size).is_none());
    }
}
