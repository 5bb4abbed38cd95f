use crate::domain::TranslationEntry;
use crate::error::Result;
use crate::infrastructure::{Locale, PageFetcher, UniqueItemScraper};
use crate::progress::RefreshProgress;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds the item translation table from the unique-item database.
pub struct TranslationTableService {
    fetcher: Arc<dyn PageFetcher>,
    scraper: UniqueItemScraper,
    concurrency: usize,
}

impl TranslationTableService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: &str, concurrency: usize) -> Self {
        info!("Created translation table service for {}", base_url);
        Self {
            fetcher,
            scraper: UniqueItemScraper::new(base_url),
            concurrency: concurrency.max(1),
        }
    }

    /// Fetches the index, then every item in all three locales with at most
    /// `concurrency` items in flight. Items missing an English or Simplified
    /// name are skipped. The result is sorted by English name.
    pub async fn scrape(&self, progress: &mut (dyn RefreshProgress + Send)) -> Result<Vec<TranslationEntry>> {
        let index = self.fetcher.fetch(&self.scraper.index_url()).await?;
        let ids = self.scraper.item_ids(&index)?;
        progress.begin(ids.len());
        progress.log(&format!("Found {} unique items", ids.len()));

        let mut results = stream::iter(ids.iter())
            .map(|id| self.entry(id))
            .buffer_unordered(self.concurrency);

        let mut entries = Vec::new();
        let mut done = 0;
        while let Some(entry) = results.next().await {
            done += 1;
            match entry {
                Some(entry) => {
                    progress.item_done(done, &entry.english);
                    entries.push(entry);
                }
                None => progress.item_done(done, "skipped"),
            }
        }

        progress.finish();
        entries.sort_by(|a, b| a.english.cmp(&b.english));
        info!("Scraped {} of {} unique items", entries.len(), ids.len());
        Ok(entries)
    }

    async fn entry(&self, item_id: &str) -> Option<TranslationEntry> {
        let (english, simplified, traditional) = futures::join!(
            self.name(item_id, Locale::English),
            self.name(item_id, Locale::Simplified),
            self.name(item_id, Locale::Traditional),
        );

        match (english, simplified) {
            (Some(english), Some(simplified)) => {
                let traditional = traditional.unwrap_or_else(|| simplified.clone());
                Some(TranslationEntry::new(english, simplified, traditional))
            }
            _ => {
                warn!("Skipping unique item {}: missing English or Simplified name", item_id);
                None
            }
        }
    }

    async fn name(&self, item_id: &str, locale: Locale) -> Option<String> {
        let url = self.scraper.item_url(item_id, locale);
        let markup = match self.fetcher.fetch(&url).await {
            Ok(markup) => markup,
            Err(e) => {
                debug!("Failed to fetch {}: {}", url, e);
                return None;
            }
        };

        match self.scraper.item_name(&markup) {
            Ok(name) => name,
            Err(e) => {
                debug!("Failed to read item name from {}: {}", url, e);
                None
            }
        }
    }
}
