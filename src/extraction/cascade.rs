use super::names::{is_stopword_or_short, NameExtractor};
use super::{element_text, selector, spaced_text, KnownItemIndex, SectionClassifier};
use crate::domain::{EquipmentItem, ItemType};
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

const CARD_SELECTOR: &str = ".equipment-item, .d4-item, .d4-gear-item, .item-card, .gear";
const CARD_NAME_SELECTOR: &str = ".item-name, .gear-name, h3, strong, .name";
const CARD_TYPE_SELECTOR: &str = ".item-type, .gear-type, .item-slot, .slot";
const UNKNOWN_ITEM: &str = "Unknown Item";
const RARITY_MARKERS: &[&str] = &["unique", "legendary", "mythic"];

const SECTION_MARKERS: &[&str] = &["great uniques for this build", "legendaries & uniques"];
const GENERIC_SECTION_MARKERS: &[&str] = &["gear", "equipment", "items", "jackpot"];

const STRUCTURED_CATEGORY: &str = "Gear";
const FULL_TEXT_CATEGORY: &str = "Mentioned";
const FREE_TEXT_CATEGORY: &str = "Detected";

const SNIPPET_CONTEXT: usize = 60;

static PROVIDES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,4})\s+(?:provides|gives|offers|helps|grants|is)\b")
        .unwrap()
});
static BEST_IN_SLOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,4})\s+(?:is best in slot|is mandatory|is optional)")
        .unwrap()
});
static PICK_UP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Pick up|Use|Equip)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,4})\s+for\b").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTier {
    Structured,
    KnownSection,
    FullText,
    FreeText,
}

/// What one executed tier contributed after deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierOutcome {
    pub tier: ExtractionTier,
    pub items: Vec<EquipmentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub tiers: Vec<TierOutcome>,
}

impl CascadeReport {
    pub fn outcome(&self, tier: ExtractionTier) -> Option<&TierOutcome> {
        self.tiers.iter().find(|outcome| outcome.tier == tier)
    }

    /// The tier that first produced an item with this exact name.
    pub fn tier_of(&self, name: &str) -> Option<ExtractionTier> {
        self.tiers
            .iter()
            .find(|outcome| outcome.items.iter().any(|item| item.name == name))
            .map(|outcome| outcome.tier)
    }

    pub fn item_count(&self) -> usize {
        self.tiers.iter().map(|outcome| outcome.items.len()).sum()
    }

    pub fn items(&self) -> impl Iterator<Item = &EquipmentItem> {
        self.tiers.iter().flat_map(|outcome| outcome.items.iter())
    }

    pub fn into_items(self) -> Vec<EquipmentItem> {
        self.tiers.into_iter().flat_map(|outcome| outcome.items).collect()
    }
}

/// Runs the extraction tiers in priority order:
///
/// 1. structured item cards; when they yield anything the cascade stops,
/// 2. list items and bold paragraphs under equipment headings,
/// 3. known unique names anywhere in the page text (always runs after 1),
/// 4. verb patterns in free text, only when tiers 1 and 2 found nothing.
///
/// Items are deduplicated by exact name across tiers, first occurrence wins.
#[derive(Debug, Clone)]
pub struct EquipmentExtractionCascade {
    known: KnownItemIndex,
}

impl Default for EquipmentExtractionCascade {
    fn default() -> Self {
        Self::new(KnownItemIndex::global().clone())
    }
}

impl EquipmentExtractionCascade {
    pub fn new(known: KnownItemIndex) -> Self {
        Self { known }
    }

    pub fn extract(&self, markup: &str) -> CascadeReport {
        let document = Html::parse_document(markup);
        self.extract_document(&document)
    }

    pub fn extract_document(&self, document: &Html) -> CascadeReport {
        let mut seen = HashSet::new();
        let mut report = CascadeReport::default();

        let structured = run_tier(ExtractionTier::Structured, &mut seen, self.structured_tier(document));
        let structured_found = !structured.items.is_empty();
        report.tiers.push(structured);

        if !structured_found {
            let section = run_tier(ExtractionTier::KnownSection, &mut seen, self.section_tier(document));
            let section_found = !section.items.is_empty();
            report.tiers.push(section);

            report
                .tiers
                .push(run_tier(ExtractionTier::FullText, &mut seen, self.full_text_tier(document)));

            if !section_found {
                report
                    .tiers
                    .push(run_tier(ExtractionTier::FreeText, &mut seen, self.free_text_tier(document)));
            }
        }

        info!(
            "Extracted {} equipment items from {} tiers",
            report.item_count(),
            report.tiers.len()
        );
        report
    }

    fn structured_tier(&self, document: &Html) -> Result<Vec<EquipmentItem>> {
        let cards = selector(CARD_SELECTOR)?;
        let names = selector(CARD_NAME_SELECTOR)?;
        let types = selector(CARD_TYPE_SELECTOR)?;

        let mut items = Vec::new();
        for card in document.select(&cards) {
            let name_element = card.select(&names).next();
            let name = name_element
                .map(element_text)
                .filter(|name| !name.is_empty() && !is_stopword_or_short(name))
                .unwrap_or_else(|| UNKNOWN_ITEM.to_string());
            let item_type = card
                .select(&types)
                .next()
                .map(element_text)
                .filter(|item_type| !item_type.is_empty())
                .unwrap_or_else(|| ItemType::Unknown.to_string());

            let flagged = has_rarity_class(card)
                || card.parent().and_then(ElementRef::wrap).is_some_and(has_rarity_class)
                || name_element.is_some_and(has_rarity_class);
            let is_unique = flagged || self.known.find_in(&name).is_some();

            items.push(
                EquipmentItem::new(name, item_type, is_unique, STRUCTURED_CATEGORY)
                    .with_description(element_text(card)),
            );
        }

        Ok(items)
    }

    fn section_tier(&self, document: &Html) -> Result<Vec<EquipmentItem>> {
        let headings = selector("h1, h2, h3, h4, h5, h6")?;
        let blocks = selector("li, p")?;
        let bold = selector("strong, b")?;
        let extractor = NameExtractor::new(&self.known);

        let mut items = Vec::new();
        for heading in document.select(&headings) {
            let title = element_text(heading);
            if !is_equipment_heading(&title) {
                continue;
            }

            let level = heading_level(heading).unwrap_or(6);
            let category = SectionClassifier::classify(&title).to_string();
            debug!("Scanning section {:?} (h{})", title, level);

            for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
                if heading_level(sibling).is_some_and(|next| next <= level) {
                    break;
                }

                let candidates: Vec<ElementRef<'_>> = if is_text_block(sibling) {
                    vec![sibling]
                } else {
                    sibling.select(&blocks).collect()
                };

                for block in candidates {
                    let text = element_text(block);
                    if text.is_empty() {
                        continue;
                    }

                    let qualifies = block.value().name() == "li"
                        || block.select(&bold).next().is_some()
                        || self.known.find_in(&text).is_some();
                    if !qualifies {
                        continue;
                    }

                    if let Some(guess) = extractor.extract(&text, Some(&title)) {
                        items.push(
                            EquipmentItem::new(
                                guess.name,
                                guess.item_type.to_string(),
                                guess.is_unique,
                                category.clone(),
                            )
                            .with_description(text),
                        );
                    }
                }
            }
        }

        Ok(items)
    }

    fn full_text_tier(&self, document: &Html) -> Result<Vec<EquipmentItem>> {
        let text = spaced_text(document.root_element());

        Ok(self
            .known
            .names()
            .iter()
            .filter(|name| text.contains(name.as_str()))
            .map(|name| {
                EquipmentItem::new(
                    name.clone(),
                    ItemType::UniqueLegendary.to_string(),
                    true,
                    FULL_TEXT_CATEGORY,
                )
                .with_description(snippet(&text, name))
            })
            .collect())
    }

    fn free_text_tier(&self, document: &Html) -> Result<Vec<EquipmentItem>> {
        let blocks = selector("p, li")?;

        let mut items = Vec::new();
        for block in document.select(&blocks) {
            let text = element_text(block);

            for pattern in [&*PROVIDES, &*BEST_IN_SLOT, &*PICK_UP] {
                for caps in pattern.captures_iter(&text) {
                    let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                        continue;
                    };
                    if is_stopword_or_short(name) {
                        continue;
                    }

                    items.push(
                        EquipmentItem::new(name, ItemType::Detected.to_string(), true, FREE_TEXT_CATEGORY)
                            .with_description(text.clone()),
                    );
                }
            }
        }

        Ok(items)
    }
}

fn run_tier(
    tier: ExtractionTier,
    seen: &mut HashSet<String>,
    candidates: Result<Vec<EquipmentItem>>,
) -> TierOutcome {
    match candidates {
        Ok(candidates) => TierOutcome {
            tier,
            items: candidates
                .into_iter()
                .filter(|item| seen.insert(item.name.clone()))
                .collect(),
            error: None,
        },
        Err(e) => {
            warn!("Extraction tier {:?} failed: {}", tier, e);
            TierOutcome {
                tier,
                items: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

fn has_rarity_class(element: ElementRef<'_>) -> bool {
    element.value().classes().any(|class| {
        let class = class.to_lowercase();
        RARITY_MARKERS.iter().any(|marker| class.contains(marker))
    })
}

fn is_equipment_heading(title: &str) -> bool {
    let lowered = title.to_lowercase();
    SECTION_MARKERS
        .iter()
        .chain(GENERIC_SECTION_MARKERS)
        .any(|marker| lowered.contains(marker))
}

fn heading_level(element: ElementRef<'_>) -> Option<u8> {
    element
        .value()
        .name()
        .strip_prefix('h')?
        .parse::<u8>()
        .ok()
        .filter(|level| (1..=6).contains(level))
}

fn is_text_block(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "li" | "p")
}

/// The first occurrence of `needle` with some surrounding context.
fn snippet(text: &str, needle: &str) -> String {
    let Some(start) = text.find(needle) else {
        return needle.to_string();
    };
    let end = start + needle.len();

    let from = text[..start]
        .char_indices()
        .rev()
        .nth(SNIPPET_CONTEXT - 1)
        .map_or(0, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(SNIPPET_CONTEXT)
        .map_or(text.len(), |(i, _)| end + i);

    text[from..to].trim().to_string()
}
