//! Spoken query input. A transcription is treated exactly like typed text
//! for the field it targets.

use tracing::{debug, warn};

use super::SearchQuery;
use crate::parse::Facet;

/// Which query field a transcription fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTarget {
    /// The plain-text name search.
    Name,
    Facet(Facet),
}

impl VoiceTarget {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "name" | "search" | "text" => Some(VoiceTarget::Name),
            other => other.parse::<Facet>().ok().map(VoiceTarget::Facet),
        }
    }
}

/// One `(field name, transcribed text)` pair from the speech recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInput {
    pub field: String,
    pub text: String,
}

impl VoiceInput {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Replace the targeted field of `query` with the trimmed transcription.
    /// Returns false, leaving `query` untouched, for an unknown field name.
    pub fn apply_to(&self, query: &mut SearchQuery) -> bool {
        let Some(target) = VoiceTarget::parse(&self.field) else {
            warn!(field = %self.field, "voice input for unknown field ignored");
            return false;
        };
        let text = self.text.trim().to_string();
        match target {
            VoiceTarget::Name => query.text = text,
            VoiceTarget::Facet(facet) => query.facets.set(facet, text),
        }
        debug!(field = %self.field, "voice input applied");
        true
    }
}
