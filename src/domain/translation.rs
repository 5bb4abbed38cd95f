use serde::{Deserialize, Deserializer, Serialize};

/// Localized names of one unique item. `english` is the canonical key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub english: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub simplified: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub traditional: String,
}

impl TranslationEntry {
    pub fn new(
        english: impl Into<String>,
        simplified: impl Into<String>,
        traditional: impl Into<String>,
    ) -> Self {
        Self {
            english: english.into(),
            simplified: simplified.into(),
            traditional: traditional.into(),
        }
    }

    /// Trims every field; entries without an english name are dropped.
    pub fn normalized(self) -> Option<Self> {
        let english = self.english.trim().to_string();
        if english.is_empty() {
            return None;
        }
        Some(Self {
            english,
            simplified: self.simplified.trim().to_string(),
            traditional: self.traditional.trim().to_string(),
        })
    }
}

fn empty_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
