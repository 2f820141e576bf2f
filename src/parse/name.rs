//! Facet extraction from a single item name.

use std::sync::OnceLock;

use regex::Regex;

use super::vocabulary::{Vocabulary, WordSet};
use super::ParsedFacets;

fn sized_pattern() -> &'static Regex {
    static SIZED: OnceLock<Regex> = OnceLock::new();
    SIZED.get_or_init(|| {
        Regex::new(r"\d+(?:\.\d+)?\s*(?:inch|watt|volt|amp|lbs|mm|cm|kg|in|ft|oz|m|g|a|v|w)\b")
            .expect("size pattern is valid")
    })
}

fn number_pattern() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid"))
}

/// First measurement in an already lower-cased name.
///
/// A number carrying a unit wins over an earlier bare number, so
/// "3 pole 32a" yields "32a". Without any unit the first number is used.
pub fn extract_size(lowered: &str) -> Option<&str> {
    sized_pattern()
        .find(lowered)
        .or_else(|| number_pattern().find(lowered))
        .map(|m| m.as_str())
}

/// Parse `name` into facet values using the candidate words in `vocab`.
///
/// For each vocabulary facet the first word (in vocabulary order) found as a
/// substring of the lower-cased name is taken and capitalized. Size comes from
/// [`extract_size`] and keeps its lower-case form.
pub fn parse_item_name(name: &str, vocab: &Vocabulary) -> ParsedFacets {
    let lowered = name.to_lowercase();
    if lowered.trim().is_empty() {
        return ParsedFacets::default();
    }

    ParsedFacets {
        product: first_contained(&vocab.products, &lowered),
        kind: first_contained(&vocab.types, &lowered),
        color: first_contained(&vocab.colors, &lowered),
        size: extract_size(&lowered).unwrap_or_default().to_string(),
        brand: first_contained(&vocab.brands, &lowered),
    }
}

fn first_contained(words: &WordSet, haystack: &str) -> String {
    words
        .iter()
        .find(|w| haystack.contains(w))
        .map(capitalize)
        .unwrap_or_default()
}

/// Upper-cases the first character, leaves the rest as is.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::parse::build_vocabulary;

    const SAMPLE: &str = "Red 3 Pole MCB Schneider 32A";

    #[test]
    fn parses_sample_name() {
        let vocab = build_vocabulary(&[CatalogItem::new("A1", "", SAMPLE)]);
        let parsed = parse_item_name(SAMPLE, &vocab);
        assert_eq!(parsed.product, "Mcb");
        assert_eq!(parsed.kind, "Pole");
        assert_eq!(parsed.color, "Red");
        assert_eq!(parsed.size, "32a");
        assert_eq!(parsed.brand, "Schneider");
    }

    #[test]
    fn empty_name_yields_empty_facets() {
        let vocab = build_vocabulary(&[CatalogItem::new("A1", "", SAMPLE)]);
        assert!(parse_item_name("", &vocab).is_empty());
    }

    #[test]
    fn first_vocabulary_word_wins() {
        let vocab = build_vocabulary(&[
            CatalogItem::new("A", "", "Copper Cable"),
            CatalogItem::new("B", "", "Cable Tray"),
        ]);
        // "cable" was learned before "tray".
        let parsed = parse_item_name("Tray for cable", &vocab);
        assert_eq!(parsed.product, "Cable");
    }

    #[test]
    fn size_variants() {
        assert_eq!(extract_size("pvc pipe 1.5 inch"), Some("1.5 inch"));
        assert_eq!(extract_size("cable 10amp"), Some("10amp"));
        assert_eq!(extract_size("conduit 25mm bend"), Some("25mm"));
        assert_eq!(extract_size("box 4 way"), Some("4"));
        // "m" must end the word to count as metres.
        assert_eq!(extract_size("3 mcb"), Some("3"));
        assert_eq!(extract_size("plain socket"), None);
    }

    #[test]
    fn capitalizes_first_letter_only() {
        assert_eq!(capitalize("schneider"), "Schneider");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclair"), "Éclair");
    }
}
