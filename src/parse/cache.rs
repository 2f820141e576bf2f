//! Bounded memo of parsed facets.
//! Key: blake3 hash of (catalog fingerprint | item name), so entries from an
//! older catalog load can never be served for a newer one.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use super::{parse_item_name, ParsedFacets, Vocabulary};
use crate::catalog::CatalogFingerprint;

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(n) => n,
    None => unreachable!(),
};

pub struct FacetCache {
    inner: Mutex<LruCache<[u8; 32], ParsedFacets>>,
}

impl FacetCache {
    /// A zero capacity falls back to 1024 entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(FALLBACK_CAPACITY);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn compute_key(fingerprint: &CatalogFingerprint, item_name: &str) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(fingerprint.as_bytes());
        hasher.update(b"|");
        hasher.update(item_name.as_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Cached facets for `item_name`, parsing and storing them on a miss.
    pub fn get_or_parse(
        &self,
        fingerprint: &CatalogFingerprint,
        item_name: &str,
        vocab: &Vocabulary,
    ) -> ParsedFacets {
        let key = Self::compute_key(fingerprint, item_name);
        if let Some(hit) = self.inner.lock().get(&key) {
            return hit.clone();
        }
        // Parse outside the lock; a racing duplicate insert is harmless.
        let parsed = parse_item_name(item_name, vocab);
        trace!(name = item_name, "facet cache miss");
        self.inner.lock().put(key, parsed.clone());
        parsed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}
