use crate::extraction::{element_text, selector};
use crate::error::Result;
use scraper::Html;
use std::collections::HashSet;
use tracing::debug;

const ITEM_LINK: &str = "a.item-name";

/// Locales a unique item page is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Simplified,
    Traditional,
}

impl Locale {
    pub fn path(self) -> &'static str {
        match self {
            Locale::English => "us",
            Locale::Simplified => "cn",
            Locale::Traditional => "tw",
        }
    }
}

/// Reads the unique-item database: the index page and per-locale item pages.
pub struct UniqueItemScraper {
    base_url: String,
}

impl UniqueItemScraper {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The index of every unique item, served in Simplified Chinese.
    pub fn index_url(&self) -> String {
        format!("{}/{}/Unique", self.base_url, Locale::Simplified.path())
    }

    pub fn item_url(&self, item_id: &str, locale: Locale) -> String {
        format!("{}/{}/{}", self.base_url, locale.path(), item_id)
    }

    /// Item ids linked from the index, first occurrence order, no duplicates.
    pub fn item_ids(&self, markup: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(markup);
        let links = selector(ITEM_LINK)?;

        let mut seen = HashSet::new();
        let ids: Vec<String> = document
            .select(&links)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(item_id)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        debug!("Found {} unique item ids", ids.len());
        Ok(ids)
    }

    /// Name shown on an item page, if the page has one.
    pub fn item_name(&self, markup: &str) -> Result<Option<String>> {
        let document = Html::parse_document(markup);
        let link = selector(ITEM_LINK)?;

        Ok(document
            .select(&link)
            .next()
            .map(element_text)
            .filter(|name| !name.is_empty()))
    }
}

/// Last path segment of an item link; `/cn/Harlequin_Crest` and
/// `Harlequin_Crest` name the same item.
fn item_id(href: &str) -> Option<String> {
    href.trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_links_become_deduplicated_ids() {
        let markup = r#"
            <a class="item-name" href="/cn/Harlequin_Crest">谐角之冠</a>
            <a class="item-name" href="Grandfather">祖父</a>
            <a class="item-name" href="/cn/Harlequin_Crest/">谐角之冠</a>
            <a class="item-name">no link</a>
            <a href="/cn/Other">not an item</a>
        "#;
        let scraper = UniqueItemScraper::new("https://db.test/");
        assert_eq!(scraper.item_ids(markup).unwrap(), ["Harlequin_Crest", "Grandfather"]);
        assert_eq!(scraper.index_url(), "https://db.test/cn/Unique");
        assert_eq!(
            scraper.item_url("Grandfather", Locale::Traditional),
            "https://db.test/tw/Grandfather"
        );
    }

    #[test]
    fn item_page_name_is_the_first_item_link() {
        let scraper = UniqueItemScraper::new("https://db.test");
        let markup = r#"<div class="card"><a class="item-name" href="x"> Harlequin  Crest </a></div>"#;
        assert_eq!(scraper.item_name(markup).unwrap().as_deref(), Some("Harlequin Crest"));
        assert_eq!(scraper.item_name("<p>gone</p>").unwrap(), None);
    }
}
