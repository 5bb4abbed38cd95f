use crate::domain::BuildEntry;
use crate::extraction::{element_text, selector};
use crate::error::Result;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const CLASSES: &[&str] = &["Rogue", "Barbarian", "Druid", "Sorcerer", "Necromancer", "Spiritborn"];

const BUILD_TYPES: &[&str] = &["endgame", "leveling"];

const SKILL_TAGS: &[&str] = &[
    "penetrating shot", "hammer of the ancients", "incinerate", "flurry", "barrage",
    "twisting blades", "blood wave", "sever", "blizzard", "blood surge", "boulder",
    "bone spear", "blight", "pulverize", "shred", "tornado", "firewall", "whirlwind",
    "ice shards", "frozen orb", "shadow step", "rend", "landslide", "thorns", "rapid fire",
    "blood lance", "double swing", "ball lightning", "lightning storm", "support", "companion",
    "chain lightning", "meteor", "infinimist", "earthquake", "death trap", "lightning spear",
    "rupture", "death blow", "stone burst", "dance of knives", "rain of arrows", "cataclysm",
    "mighty throw", "invigorating strike", "heartseeker", "bone spirit", "minion",
    // Spiritborn
    "quill volley", "eagle", "spirit surge", "spirit storm", "wrath", "panther", "snake", "bear",
    "wolf", "tiger", "gorilla", "owl", "hawk", "falcon", "vulture", "condor",
    "eagle form", "panther form", "snake form", "bear form", "wolf form", "tiger form",
    "gorilla form", "owl form", "hawk form", "falcon form", "vulture form", "condor form",
    "spirit guide",
];

const SEASON_TAGS: &[(&str, &[&str])] = &[("season 8", &["season 8", "belial's return"])];

const CARD_SELECTORS: &[&str] = &[
    "article",
    ".d4-build-card",
    ".build-card",
    ".guide-card",
    ".guide-item",
    ".content-card",
];

const GUIDE_PATH: &str = "/d4/build-guides/";
const MIN_TITLE_LEN: usize = 5;

struct CardSelectors {
    title: Selector,
    link: Selector,
    class: Selector,
    difficulty: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            title: selector(".title, h2, h3, .card-title, .guide-title, a")?,
            link: selector("a[href]")?,
            class: selector(".class, .character-class, .build-class")?,
            difficulty: selector(".difficulty, .build-difficulty")?,
        })
    }
}

/// Discovers build guides on the listing page.
pub struct BuildListScraper {
    base_url: String,
}

impl BuildListScraper {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn parse(&self, markup: &str) -> Result<Vec<BuildEntry>> {
        let document = Html::parse_document(markup);
        self.extract_builds(&document)
    }

    /// Tries each card selector in turn; the first one producing builds wins.
    pub fn extract_builds(&self, document: &Html) -> Result<Vec<BuildEntry>> {
        let selectors = CardSelectors::new()?;

        for css in CARD_SELECTORS {
            let cards = selector(css)?;
            let mut seen = HashSet::new();
            let mut builds = Vec::new();

            for card in document.select(&cards) {
                let Some(build) = self.parse_card(card, &selectors) else {
                    continue;
                };
                if seen.insert(build.url.clone()) {
                    builds.push(build);
                } else {
                    debug!("Skipping duplicate build: {}", build.url);
                }
            }

            if !builds.is_empty() {
                info!("Found {} builds with selector {}", builds.len(), css);
                return Ok(builds);
            }
        }

        warn!("No build cards found on listing page");
        Ok(Vec::new())
    }

    fn parse_card(&self, card: scraper::ElementRef<'_>, selectors: &CardSelectors) -> Option<BuildEntry> {
        let title = card.select(&selectors.title).next().map(element_text)?;
        let lowered = title.to_lowercase();

        if title.chars().count() < MIN_TITLE_LEN {
            debug!("Skipping card, title too short: {:?}", title);
            return None;
        }
        if !CLASSES.iter().any(|class| lowered.contains(&class.to_lowercase())) {
            debug!("Skipping card, no class in title: {:?}", title);
            return None;
        }

        let Some(href) = card
            .select(&selectors.link)
            .filter_map(|link| link.value().attr("href"))
            .find(|href| href.contains(GUIDE_PATH))
        else {
            debug!("Skipping card without a build guide link: {:?}", title);
            return None;
        };
        let url = if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            href.to_string()
        };

        let character_class = card
            .select(&selectors.class)
            .next()
            .map(element_text)
            .filter(|class| !class.is_empty())
            .or_else(|| class_from_title(&lowered).map(str::to_string))
            .unwrap_or_else(|| "Unknown".to_string());

        let mut build = BuildEntry::new(title, url, character_class).with_tags(tags_from_title(&lowered));
        if let Some(difficulty) = card
            .select(&selectors.difficulty)
            .next()
            .map(element_text)
            .filter(|difficulty| !difficulty.is_empty())
        {
            build = build.with_difficulty(difficulty);
        }

        Some(build)
    }
}

fn class_from_title(lowered: &str) -> Option<&'static str> {
    CLASSES
        .iter()
        .copied()
        .find(|class| lowered.contains(&class.to_lowercase()))
}

fn tags_from_title(lowered: &str) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(build_type) = BUILD_TYPES.iter().find(|t| lowered.contains(*t)) {
        tags.push(build_type.to_string());
    }
    tags.extend(
        CLASSES
            .iter()
            .map(|class| class.to_lowercase())
            .filter(|class| lowered.contains(class.as_str())),
    );
    tags.extend(
        SKILL_TAGS
            .iter()
            .filter(|skill| lowered.contains(*skill))
            .map(|skill| skill.to_string()),
    );
    for (season, values) in SEASON_TAGS {
        if lowered.contains(season) || values.iter().any(|value| lowered.contains(value)) {
            tags.extend(values.iter().map(|value| value.to_string()));
        }
    }

    tags
}

/// Builds used when the listing cannot be fetched or yields nothing.
pub fn fallback_builds() -> Vec<BuildEntry> {
    vec![
        BuildEntry::new(
            "Penetrating Shot Rogue Endgame Build Guide",
            "https://maxroll.gg/d4/build-guides/penetrating-shot-rogue-guide",
            "Rogue",
        )
        .with_difficulty("High")
        .with_tags(["ranged", "aoe"]),
        BuildEntry::new(
            "Pulverize Druid Endgame Build Guide",
            "https://maxroll.gg/d4/build-guides/pulverize-druid-guide",
            "Druid",
        )
        .with_tags(["melee", "aoe"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <main>
          <div class="build-card">
            <h3>Penetrating Shot Rogue Endgame Build Guide</h3>
            <a href="/d4/build-guides/penetrating-shot-rogue-guide">Read</a>
            <span class="difficulty">High</span>
          </div>
          <div class="build-card">
            <h3>Quill Volley Spiritborn Leveling Guide Season 8</h3>
            <a href="/news/unrelated">News</a>
            <a href="https://maxroll.gg/d4/build-guides/quill-volley-spiritborn-guide">Read</a>
            <span class="character-class">Spiritborn</span>
          </div>
          <div class="build-card">
            <h3>Penetrating Shot Rogue Endgame Build Guide</h3>
            <a href="/d4/build-guides/penetrating-shot-rogue-guide">Duplicate</a>
          </div>
          <div class="build-card"><h3>Tier List Overview</h3><a href="/d4/build-guides/">x</a></div>
          <div class="build-card"><h3>Druid Guide</h3><a href="/d4/tier-list">x</a></div>
        </main>
    "#;

    #[test]
    fn parses_cards_with_the_first_matching_selector() {
        let builds = BuildListScraper::new("https://maxroll.gg/").parse(LISTING).unwrap();
        assert_eq!(builds.len(), 2);

        let rogue = &builds[0];
        assert_eq!(rogue.url, "https://maxroll.gg/d4/build-guides/penetrating-shot-rogue-guide");
        assert_eq!(rogue.character_class, "Rogue");
        assert_eq!(rogue.difficulty, "High");
        for tag in ["endgame", "rogue", "penetrating shot"] {
            assert!(rogue.tags.contains(tag), "missing {tag}");
        }

        let spiritborn = &builds[1];
        assert_eq!(spiritborn.character_class, "Spiritborn");
        assert_eq!(spiritborn.difficulty, "Medium");
        for tag in ["leveling", "spiritborn", "quill volley", "season 8", "belial's return"] {
            assert!(spiritborn.tags.contains(tag), "missing {tag}");
        }
    }

    #[test]
    fn later_selectors_are_tried_when_earlier_ones_yield_nothing() {
        let markup = r#"
            <article><h2>Patch notes</h2></article>
            <div class="guide-card">
              <a class="guide-title" href="/d4/build-guides/blizzard-sorcerer-guide">Blizzard Sorcerer Guide</a>
            </div>
        "#;
        let builds = BuildListScraper::new("https://maxroll.gg").parse(markup).unwrap();
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].character_class, "Sorcerer");
        assert!(builds[0].tags.contains("blizzard"));
    }

    #[test]
    fn spirit_form_titles_get_form_tags() {
        let markup = r#"<div class="build-card">
              <h3>Bear Form Spiritborn Endgame Build</h3>
              <a href="/d4/build-guides/bear-spiritborn-guide">Read</a>
            </div>"#;
        let builds = BuildListScraper::new("https://maxroll.gg").parse(markup).unwrap();
        for tag in ["bear", "bear form", "spiritborn", "endgame"] {
            assert!(builds[0].tags.contains(tag), "missing {tag}");
        }
    }

    #[test]
    fn page_without_cards_yields_nothing() {
        let builds = BuildListScraper::new("https://maxroll.gg").parse("<p>maintenance</p>").unwrap();
        assert!(builds.is_empty());
    }

    #[test]
    fn fallback_list_has_known_guides() {
        let builds = fallback_builds();
        assert_eq!(builds.len(), 2);
        assert!(builds.iter().all(|build| build.url.contains(GUIDE_PATH)));
        assert!(builds.iter().all(|build| build.equipment.is_empty()));
    }
}
