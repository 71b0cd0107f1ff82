//! Gallery
//!
//! The learning view of a category: every picture with its word and the
//! letter-by-letter spelling that can be read aloud.

use crate::catalog::{Catalog, PracticeItem};
use crate::core::label;
use crate::error::PracticeResult;
use crate::tts::{self, TtsEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub item: PracticeItem,
    /// Upper-case word as printed on the button
    pub word: String,
    pub spelling: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    category: String,
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    pub fn open(catalog: &Catalog, category: &str) -> PracticeResult<Self> {
        let entries = catalog
            .load(category)?
            .into_iter()
            .map(|item| GalleryEntry {
                word: item.label.to_uppercase(),
                spelling: label::spell_out(&item.label),
                item,
            })
            .collect();
        Ok(Self {
            category: catalog.canonical_name(category).unwrap_or(category).to_string(),
            entries,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    /// Entry for a word, compared like an answer
    pub fn find(&self, word: &str) -> Option<&GalleryEntry> {
        let word = word.trim().to_lowercase();
        self.entries.iter().find(|e| e.item.label == word)
    }

    /// Read a word's spelling aloud; false when the word is not in the gallery
    pub async fn spell_aloud(&self, engine: &dyn TtsEngine, word: &str) -> bool {
        match self.find(word) {
            Some(entry) => {
                tts::speak_sequence(engine, &entry.spelling).await;
                true
            }
            None => false,
        }
    }
}
