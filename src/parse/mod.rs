//! Material name parsing: vocabulary learning, facet extraction and memoization.

pub mod cache;
pub mod name;
pub mod tokenize;
pub mod vocabulary;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use cache::FacetCache;
pub use name::parse_item_name;
pub use vocabulary::{build_vocabulary, Vocabulary};

/// Semantic category a name token can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Product,
    Type,
    Color,
    Size,
    Brand,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Product,
        Facet::Type,
        Facet::Color,
        Facet::Size,
        Facet::Brand,
    ];
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::Product => write!(f, "product"),
            Facet::Type => write!(f, "type"),
            Facet::Color => write!(f, "color"),
            Facet::Size => write!(f, "size"),
            Facet::Brand => write!(f, "brand"),
        }
    }
}

impl FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "product" => Ok(Facet::Product),
            "type" => Ok(Facet::Type),
            "color" | "colour" => Ok(Facet::Color),
            "size" => Ok(Facet::Size),
            "brand" => Ok(Facet::Brand),
            other => Err(format!("unknown facet: {other}")),
        }
    }
}

/// Facet values extracted from one item name. Empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFacets {
    pub product: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub size: String,
    pub brand: String,
}

impl ParsedFacets {
    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::Product => &self.product,
            Facet::Type => &self.kind,
            Facet::Color => &self.color,
            Facet::Size => &self.size,
            Facet::Brand => &self.brand,
        }
    }

    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}
