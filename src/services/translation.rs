use crate::domain::TranslationEntry;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};
use unicode_normalization::UnicodeNormalization;

/// A query resolved to the English item name it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalName {
    pub name: String,
    /// True when the query matched a Chinese name.
    pub localized: bool,
}

impl CanonicalName {
    fn english(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            localized: false,
        }
    }

    fn localized(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            localized: true,
        }
    }
}

/// Resolves item names in English, Simplified or Traditional Chinese to
/// the canonical English name.
#[derive(Debug, Default)]
pub struct ItemTranslator {
    entries: Vec<TranslationEntry>,
    by_english: FxHashMap<String, String>,
    by_localized: FxHashMap<String, String>,
}

impl ItemTranslator {
    /// Loads a JSON array of translation entries. A missing or malformed
    /// file yields an empty translator.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!("Item translation file not found: {}", path.display());
            return Self::default();
        }

        let records: Vec<serde_json::Value> = match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to load item translations from {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let total = records.len();
        let entries: Vec<TranslationEntry> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<TranslationEntry>(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping translation record: {}", e);
                    None
                }
            })
            .collect();
        if entries.len() < total {
            warn!("Skipped {} malformed translation records", total - entries.len());
        }

        Self::from_entries(entries)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TranslationEntry>) -> Self {
        let mut translator = Self::default();

        for entry in entries.into_iter().filter_map(TranslationEntry::normalized) {
            translator
                .by_english
                .insert(fold(&entry.english), entry.english.clone());
            for localized in [&entry.simplified, &entry.traditional] {
                if !localized.is_empty() {
                    translator
                        .by_localized
                        .insert(fold(localized), entry.english.clone());
                }
            }
            translator.entries.push(entry);
        }

        info!(
            "Loaded {} item translations ({} Chinese mappings)",
            translator.entries.len(),
            translator.by_localized.len()
        );
        translator
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact localized match, then exact English match, then the first entry
    /// with a partial match (simplified, traditional, english). Falls back
    /// to the trimmed query itself.
    pub fn canonical_name(&self, query: &str) -> CanonicalName {
        let query = query.trim();
        if query.is_empty() {
            return CanonicalName::english(query);
        }

        let needle = fold(query);
        if let Some(english) = self.by_localized.get(&needle) {
            return CanonicalName::localized(english.as_str());
        }
        if let Some(english) = self.by_english.get(&needle) {
            return CanonicalName::english(english.as_str());
        }

        for entry in &self.entries {
            if contains_folded(&entry.simplified, &needle) || contains_folded(&entry.traditional, &needle) {
                return CanonicalName::localized(entry.english.as_str());
            }
            if contains_folded(&entry.english, &needle) {
                return CanonicalName::english(entry.english.as_str());
            }
        }

        CanonicalName::english(query)
    }

    pub fn translate_to_english(&self, name: &str) -> String {
        self.canonical_name(name).name
    }
}

fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

fn contains_folded(candidate: &str, needle: &str) -> bool {
    !candidate.is_empty() && fold(candidate).contains(needle)
}
