//! Catalog records and pick-list entries.
//! Field names follow the JSON the requisition screens exchange
//! (`itemCode`, `subMaterialNo`, `Qty`, ...), so snapshots and stored
//! selections round-trip without a mapping layer.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

/// Structured identity of a catalog variant.
///
/// Compared field by field, so `("AB", "1")` and `("A", "B1")` stay distinct.
/// A blank sub-material number is stored as `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub item_code: String,
    pub sub_material_no: String,
}

impl ItemKey {
    /// Surrounding whitespace is trimmed from both parts, so `" A"` and `"A"`
    /// name the same item; the backend pads codes in some payloads.
    pub fn new(item_code: &str, sub_material_no: &str) -> Self {
        Self {
            item_code: item_code.trim().to_string(),
            sub_material_no: normalize_sub_material_no(sub_material_no),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.item_code, self.sub_material_no)
    }
}

/// Blank or whitespace-only sub-material numbers collapse to `"0"`.
pub fn normalize_sub_material_no(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// One stockable material variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "text_or_number")]
    pub item_code: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub sub_material_no: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub item_name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub uom_stock: String,
}

impl CatalogItem {
    pub fn new(item_code: &str, sub_material_no: &str, item_name: &str) -> Self {
        Self {
            item_code: item_code.to_string(),
            sub_material_no: sub_material_no.to_string(),
            item_name: item_name.to_string(),
            uom_stock: String::new(),
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.item_code, &self.sub_material_no)
    }
}

/// User-entered fields attached to a picked material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditFields {
    #[serde(rename = "Qty", default, deserialize_with = "text_or_number", skip_serializing_if = "String::is_empty")]
    pub qty: String,
    #[serde(rename = "RequiredDate", default, deserialize_with = "text_or_number", skip_serializing_if = "String::is_empty")]
    pub required_date: String,
    #[serde(rename = "Priority", default, deserialize_with = "text_or_number", skip_serializing_if = "String::is_empty")]
    pub priority: String,
    #[serde(rename = "Remarks", default, deserialize_with = "text_or_number", skip_serializing_if = "String::is_empty")]
    pub remarks: String,
    #[serde(rename = "BOQRef", default, deserialize_with = "text_or_number", skip_serializing_if = "String::is_empty")]
    pub boq_ref: String,
}

/// A catalog item in a pick list, plus whatever the user typed for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(flatten)]
    pub edits: EditFields,
}

impl SelectionEntry {
    pub fn key(&self) -> ItemKey {
        self.item.key()
    }

    pub fn with_edits(item: CatalogItem, edits: EditFields) -> Self {
        Self { item, edits }
    }
}

impl From<CatalogItem> for SelectionEntry {
    fn from(item: CatalogItem) -> Self {
        Self {
            item,
            edits: EditFields::default(),
        }
    }
}

/// Accepts a JSON string, number or null and yields a string.
/// The backend sends codes and quantities either way.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => String::new(),
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(x)) => x.to_string(),
        Some(Raw::Flag(b)) => b.to_string(),
    })
}

/// Version stamp of one catalog load. Derived data (vocabulary, parsed
/// facets) is valid only for the fingerprint it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogFingerprint(blake3::Hash);

impl CatalogFingerprint {
    pub fn of(items: &[CatalogItem]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(items.len() as u64).to_le_bytes());
        for item in items {
            for field in [
                &item.item_code,
                &item.sub_material_no,
                &item.item_name,
                &item.uom_stock,
            ] {
                hasher.update(field.as_bytes());
                hasher.update(b"\x1f");
            }
            hasher.update(b"\x1e");
        }
        Self(hasher.finalize())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for CatalogFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell loads apart in logs.
        write!(f, "{}", &self.0.to_hex().as_str()[..16])
    }
}

#[derive(Debug)]
pub enum CatalogLoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLoadError::Io(e) => write!(f, "catalog snapshot IO error: {e}"),
            CatalogLoadError::Parse(e) => write!(f, "catalog snapshot parse error: {e}"),
        }
    }
}

impl std::error::Error for CatalogLoadError {}

impl From<std::io::Error> for CatalogLoadError {
    fn from(e: std::io::Error) -> Self {
        CatalogLoadError::Io(e)
    }
}

impl From<serde_json::Error> for CatalogLoadError {
    fn from(e: serde_json::Error) -> Self {
        CatalogLoadError::Parse(e)
    }
}

/// Locally stored catalog snapshot: either a bare JSON array of items
/// or an object with an `items` array.
pub struct CatalogSnapshot;

impl CatalogSnapshot {
    pub fn load_from_file(path: &Path) -> Result<Vec<CatalogItem>, CatalogLoadError> {
        let content = std::fs::read_to_string(path)?;
        let items = Self::from_json(&content)?;
        info!(path = %path.display(), items = items.len(), "catalog snapshot loaded");
        Ok(items)
    }

    pub fn from_json(content: &str) -> Result<Vec<CatalogItem>, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum SnapshotFile {
            Bare(Vec<CatalogItem>),
            Wrapped { items: Vec<CatalogItem> },
        }

        let items = match serde_json::from_str::<SnapshotFile>(content)? {
            SnapshotFile::Bare(items) => items,
            SnapshotFile::Wrapped { items } => items,
        };
        debug!(items = items.len(), "catalog snapshot parsed");
        Ok(items)
    }
}
