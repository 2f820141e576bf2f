//! Word splitting and token classification for material names.

use std::sync::OnceLock;

use regex::Regex;

use super::Facet;

/// Fixed reference list of colour words. Tokens must match exactly.
pub const REFERENCE_COLORS: [&str; 25] = [
    "red", "blue", "green", "yellow", "black", "white", "grey", "gray", "orange", "brown",
    "pink", "purple", "violet", "silver", "gold", "golden", "maroon", "cream", "ivory", "beige",
    "navy", "cyan", "magenta", "teal", "copper",
];

/// Substrings that mark a token as a product type.
const TYPE_MARKERS: [&str; 3] = ["pole", "case", "circuit"];

/// Substrings that mark a token as a brand.
const BRAND_MARKERS: [&str; 4] = ["siemens", "schneider", "havells", "abb"];

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[\s\-_,]+").expect("separator pattern is valid"))
}

/// Lower-cases `name` and splits it on whitespace, hyphen, underscore and comma runs.
/// Returns only tokens worth classifying: longer than two characters and not purely numeric.
pub fn tokenize(name: &str) -> Vec<String> {
    let lowered = name.to_lowercase();
    separator()
        .split(&lowered)
        .filter(|token| is_significant(token))
        .map(str::to_string)
        .collect()
}

fn is_significant(token: &str) -> bool {
    token.chars().count() > 2 && !token.chars().all(|c| c.is_ascii_digit())
}

/// Assigns a lower-cased token to a facet.
///
/// Precedence is fixed: colour, then type, then brand, else product.
/// A token like "abbcase" is a type, never a brand.
pub fn classify(token: &str) -> Facet {
    if REFERENCE_COLORS.contains(&token) {
        Facet::Color
    } else if TYPE_MARKERS.iter().any(|m| token.contains(m)) {
        Facet::Type
    } else if BRAND_MARKERS.iter().any(|m| token.contains(m)) {
        Facet::Brand
    } else {
        Facet::Product
    }
}
