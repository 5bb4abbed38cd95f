//! Heuristic recovery of equipment from build-guide markup.
//!
//! The page structure of guide sites is unstable, so extraction is a cascade
//! of progressively looser strategies (see [`EquipmentExtractionCascade`])
//! built on three small pieces: the known-item list, the name extractor and
//! the section classifier.

mod cascade;
pub mod known_items;
pub mod names;
pub mod sections;

pub use cascade::{CascadeReport, EquipmentExtractionCascade, ExtractionTier, TierOutcome};
pub use known_items::KnownItemIndex;
pub use names::{NameExtractor, NameGuess, NamePattern};
pub use sections::{SectionCategory, SectionClassifier};

use crate::error::{GearError, Result};
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| GearError::Selector(format!("{css}: {e}")))
}

/// Text of an element with typographic apostrophes folded and whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse(&element.text().collect::<String>())
}

/// Like [`element_text`] but separates text nodes, so adjacent blocks never fuse.
pub(crate) fn spaced_text(element: ElementRef<'_>) -> String {
    collapse(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
