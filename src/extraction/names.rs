use super::known_items::KnownItemIndex;
use crate::domain::ItemType;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Capitalized words that regularly open sentences and are never item names.
pub const STOPWORDS: &[&str] = &[
    "This", "The", "These", "Those", "That", "Each", "Every", "Some", "Your", "Their",
];

const REJECTED_PREFIXES: &[&str] = &["In the", "With the", "Pit"];

const WEAPON_WORDS: &[&str] = &[
    "sword", "axe", "mace", "staff", "wand", "bow", "crossbow", "dagger", "rod",
];
const ARMOR_WORDS: &[&str] = &["helm", "chest", "gloves", "boots", "pants", "shoulders", "mantle"];
const JEWELRY_WORDS: &[&str] = &["ring", "amulet", "necklace", "signet", "embrace"];

/// Ordinary words that contain a slot keyword; masked before matching.
const FALSE_FRIENDS: &[&str] = &["bring", "during", "string", "spring", "offering", "product", "elbow", "rainbow"];

static NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\d+\.[ \t]*([^\[\]\d\n]+?)(?:\s\(|\s-|$)").unwrap()
});

static CONNECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:'s|')?(?:(?:\s+of\s+the|\s+of|\s+the)?\s+[A-Z][a-z]+(?:'s|')?){1,4}")
        .unwrap()
});

static CAPITALIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,4}\b").unwrap());

/// Which attempt produced a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePattern {
    KnownItem,
    Numbered,
    Connected,
    Capitalized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGuess {
    pub name: String,
    pub item_type: ItemType,
    pub is_unique: bool,
    pub pattern: NamePattern,
}

/// True for names no extraction path may emit.
pub fn is_stopword_or_short(name: &str) -> bool {
    name.chars().count() <= 3 || STOPWORDS.contains(&name)
}

pub struct NameExtractor<'a> {
    known: &'a KnownItemIndex,
}

impl<'a> NameExtractor<'a> {
    pub fn new(known: &'a KnownItemIndex) -> Self {
        Self { known }
    }

    /// Best single guess for the item named in `text`. `section` is the
    /// title of the heading the text was found under, if any.
    pub fn extract(&self, text: &str, section: Option<&str>) -> Option<NameGuess> {
        if let Some(known) = self.known.find_in(text) {
            return Some(NameGuess {
                name: known.to_string(),
                item_type: ItemType::UniqueLegendary,
                is_unique: true,
                pattern: NamePattern::KnownItem,
            });
        }

        let (name, pattern) = self.propose(text)?;
        let item_type = infer_type(text, section);

        Some(NameGuess {
            name,
            item_type,
            is_unique: item_type == ItemType::Unique,
            pattern,
        })
    }

    fn propose(&self, text: &str) -> Option<(String, NamePattern)> {
        let numbered = NUMBERED
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()));
        if let Some(name) = first_accepted(numbered) {
            return Some((name, NamePattern::Numbered));
        }

        let connected = CONNECTED
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|candidate| {
                candidate.contains('\'') || candidate.contains(" of ") || candidate.contains(" the ")
            });
        if let Some(name) = first_accepted(connected) {
            return Some((name, NamePattern::Connected));
        }

        let capitalized = CAPITALIZED.find_iter(text).map(|m| m.as_str());
        if let Some(name) = first_accepted(capitalized) {
            return Some((name, NamePattern::Capitalized));
        }

        debug!("No item name found in {:?}", text);
        None
    }
}

fn first_accepted<'t>(candidates: impl Iterator<Item = &'t str>) -> Option<String> {
    candidates.map(clean_name).find(|name| !is_rejected(name))
}

fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '-') || c.is_whitespace())
        .to_string()
}

fn is_rejected(name: &str) -> bool {
    is_stopword_or_short(name) || REJECTED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

fn infer_type(text: &str, section: Option<&str>) -> ItemType {
    let lowered = text.to_lowercase();

    if lowered.contains("aspect") {
        return ItemType::LegendaryAspect;
    }
    if section.is_some_and(|title| title.to_lowercase().contains("unique")) {
        return ItemType::Unique;
    }

    let masked = FALSE_FRIENDS
        .iter()
        .fold(lowered, |text, word| text.replace(word, " "));
    let mentions = |keywords: &[&str]| keywords.iter().any(|keyword| masked.contains(keyword));

    if mentions(WEAPON_WORDS) {
        ItemType::Weapon
    } else if mentions(ARMOR_WORDS) {
        ItemType::Armor
    } else if mentions(JEWELRY_WORDS) {
        ItemType::Jewelry
    } else {
        ItemType::Unknown
    }
}
