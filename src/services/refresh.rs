use crate::config::ScraperSettings;
use crate::domain::{BuildCatalog, BuildEntry, Storage};
use crate::error::Result;
use crate::extraction::EquipmentExtractionCascade;
use crate::infrastructure::{fallback_builds, BuildListScraper, PageFetcher};
use crate::progress::RefreshProgress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Rediscover the build list, then extract equipment for every build.
    #[default]
    Full,
    /// Keep the persisted build list and only re-extract equipment.
    Equipment,
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshMode::Full => f.write_str("full"),
            RefreshMode::Equipment => f.write_str("equipment"),
        }
    }
}

/// The scrape pipeline: discover, fetch each build, extract, persist.
pub struct RefreshService {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn Storage>,
    cascade: EquipmentExtractionCascade,
    settings: ScraperSettings,
}

impl RefreshService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn Storage>,
        cascade: EquipmentExtractionCascade,
        settings: ScraperSettings,
    ) -> Self {
        info!("Created new Refresh service for {}", settings.base_url);
        Self {
            fetcher,
            store,
            cascade,
            settings,
        }
    }

    /// Fetches the listing page; falls back to the built-in list when the
    /// page cannot be fetched or parsed, or yields no builds.
    pub async fn discover_builds(&self) -> Vec<BuildEntry> {
        let url = self.settings.builds_url();
        info!("Discovering builds from {}", url);

        let builds = match self.fetcher.fetch(&url).await {
            Ok(markup) => BuildListScraper::new(&self.settings.base_url).parse(&markup),
            Err(e) => Err(e),
        };

        match builds {
            Ok(builds) if !builds.is_empty() => builds,
            Ok(_) => {
                warn!("Listing page had no builds, using fallback list");
                fallback_builds()
            }
            Err(e) => {
                warn!("Failed to discover builds ({}), using fallback list", e);
                fallback_builds()
            }
        }
    }

    pub async fn run(
        &self,
        mode: RefreshMode,
        progress: &mut (dyn RefreshProgress + Send),
    ) -> Result<BuildCatalog> {
        info!("Starting {} refresh", mode);
        progress.log(&format!("Starting {} refresh", mode));

        let mut catalog = match mode {
            RefreshMode::Full => BuildCatalog::from_entries(self.discover_builds().await),
            RefreshMode::Equipment => self.persisted_or_discovered().await,
        };

        let targets: Vec<(String, String)> = catalog
            .entries()
            .iter()
            .map(|build| (build.url.clone(), build.title.clone()))
            .collect();
        progress.begin(targets.len());
        progress.log(&format!("Processing {} builds", targets.len()));

        for (i, (url, title)) in targets.iter().enumerate() {
            let items = match self.fetcher.fetch(url).await {
                Ok(markup) => self.cascade.extract(&markup).into_items(),
                Err(e) => {
                    warn!("Failed to fetch {}: {}", url, e);
                    progress.log(&format!("Failed to fetch {}: {}", title, e));
                    Vec::new()
                }
            };

            info!("{}: {} equipment items", title, items.len());
            catalog.set_equipment(url, items);

            if let Err(e) = self.store.save_catalog(&catalog) {
                error!("Failed to save build data after {}: {}", title, e);
                progress.log(&format!("Failed to save build data: {}", e));
            }

            progress.item_done(i + 1, title);
            sleep(self.settings.request_delay).await;
        }

        progress.finish();
        info!("Refresh finished with {} builds", catalog.len());
        Ok(catalog)
    }

    /// Discovers builds without extracting equipment.
    pub async fn list_builds(&self) -> Vec<BuildEntry> {
        BuildCatalog::from_entries(self.discover_builds().await)
            .entries()
            .to_vec()
    }

    async fn persisted_or_discovered(&self) -> BuildCatalog {
        match self.store.load_catalog() {
            Ok(Some(catalog)) if !catalog.is_empty() => catalog,
            Ok(_) => {
                info!("No persisted builds, discovering first");
                BuildCatalog::from_entries(self.discover_builds().await)
            }
            Err(e) => {
                warn!("Failed to load persisted builds ({}), discovering first", e);
                BuildCatalog::from_entries(self.discover_builds().await)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::GearError;
    use crate::infrastructure::FileSystemStore;
    use crate::progress::NullProgress;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    pub(crate) const BASE: &str = "https://guides.test";

    /// Serves canned markup per url and records every request.
    #[derive(Default)]
    pub(crate) struct FakeFetcher {
        pages: HashMap<String, String>,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub(crate) fn with_page(mut self, url: &str, markup: &str) -> Self {
            self.pages.insert(url.to_string(), markup.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| GearError::Fetch {
                url: url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
        }
    }

    pub(crate) fn settings() -> ScraperSettings {
        ScraperSettings {
            base_url: BASE.to_string(),
            request_delay: Duration::ZERO,
        }
    }

    pub(crate) fn listing() -> String {
        r#"<div class="build-card">
             <h3>Penetrating Shot Rogue Endgame Build</h3>
             <a href="/d4/build-guides/rogue">Read</a>
           </div>
           <div class="build-card">
             <h3>Pulverize Druid Endgame Build</h3>
             <a href="/d4/build-guides/druid">Read</a>
           </div>"#
            .to_string()
    }

    pub(crate) fn guide_fetcher() -> FakeFetcher {
        FakeFetcher::default()
            .with_page(&format!("{BASE}/d4/build-guides"), &listing())
            .with_page(
                &format!("{BASE}/d4/build-guides/rogue"),
                "<p>Harlequin Crest is mandatory and Grandfather provides crit.</p>",
            )
    }

    #[derive(Default)]
    struct RecordingProgress {
        total: usize,
        done: Vec<(usize, String)>,
        finished: bool,
    }

    impl RefreshProgress for RecordingProgress {
        fn begin(&mut self, total: usize) {
            self.total = total;
        }

        fn item_done(&mut self, current: usize, title: &str) {
            self.done.push((current, title.to_string()));
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }

    fn service(fetcher: FakeFetcher, store: FileSystemStore) -> RefreshService {
        RefreshService::new(
            Arc::new(fetcher),
            Arc::new(store),
            EquipmentExtractionCascade::default(),
            settings(),
        )
    }

    #[tokio::test]
    async fn full_refresh_extracts_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());
        let service = service(guide_fetcher(), store.clone());

        let mut progress = RecordingProgress::default();
        let catalog = service.run(RefreshMode::Full, &mut progress).await.unwrap();

        assert_eq!(catalog.len(), 2);
        let rogue = catalog.get(&format!("{BASE}/d4/build-guides/rogue")).unwrap();
        let names: Vec<_> = rogue.equipment.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Grandfather", "Harlequin Crest"]);

        let druid = catalog.get(&format!("{BASE}/d4/build-guides/druid")).unwrap();
        assert!(druid.equipment.is_empty(), "fetch failures leave equipment empty");

        assert_eq!(progress.total, 2);
        assert_eq!(progress.done.len(), 2);
        assert_eq!(progress.done[1].0, 2);
        assert!(progress.finished);

        assert_eq!(store.load_catalog().unwrap(), Some(catalog));
    }

    #[tokio::test]
    async fn listing_failure_uses_fallback_builds() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(FakeFetcher::default(), FileSystemStore::new(dir.path()));

        let builds = service.discover_builds().await;
        assert_eq!(builds, fallback_builds());
    }

    #[tokio::test]
    async fn equipment_refresh_keeps_persisted_builds() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());
        let url = format!("{BASE}/d4/build-guides/rogue");
        store
            .save_catalog(&BuildCatalog::from_entries([BuildEntry::new("Saved Rogue", url.clone(), "Rogue")]))
            .unwrap();

        let fetcher = Arc::new(guide_fetcher());
        let service = RefreshService::new(
            fetcher.clone(),
            Arc::new(store),
            EquipmentExtractionCascade::default(),
            settings(),
        );
        let catalog = service.run(RefreshMode::Equipment, &mut NullProgress).await.unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].title, "Saved Rogue");
        assert_eq!(catalog.entries()[0].equipment.len(), 2);
        assert_eq!(*fetcher.requests.lock().unwrap(), [url]);
    }

    #[tokio::test]
    async fn pauses_after_every_build() {
        let dir = tempfile::tempdir().unwrap();
        let service = RefreshService::new(
            Arc::new(guide_fetcher()),
            Arc::new(FileSystemStore::new(dir.path())),
            EquipmentExtractionCascade::default(),
            ScraperSettings {
                request_delay: Duration::from_millis(40),
                ..settings()
            },
        );

        let started = std::time::Instant::now();
        service.run(RefreshMode::Full, &mut NullProgress).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn every_processed_build_is_saved() {
        struct CountingStore {
            inner: FileSystemStore,
            saves: Mutex<usize>,
        }

        impl Storage for CountingStore {
            fn load_catalog(&self) -> Result<Option<BuildCatalog>> {
                self.inner.load_catalog()
            }

            fn save_catalog(&self, catalog: &BuildCatalog) -> Result<()> {
                *self.saves.lock().unwrap() += 1;
                self.inner.save_catalog(catalog)
            }

            fn export_builds(&self, builds: &[BuildEntry], path: &std::path::Path) -> Result<()> {
                self.inner.export_builds(builds, path)
            }

            fn export_translations(
                &self,
                entries: &[crate::domain::TranslationEntry],
                path: &std::path::Path,
            ) -> Result<()> {
                self.inner.export_translations(entries, path)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CountingStore {
            inner: FileSystemStore::new(dir.path()),
            saves: Mutex::new(0),
        });
        let service = RefreshService::new(
            Arc::new(guide_fetcher()),
            store.clone(),
            EquipmentExtractionCascade::default(),
            settings(),
        );

        service.run(RefreshMode::Full, &mut NullProgress).await.unwrap();
        assert_eq!(*store.saves.lock().unwrap(), 2);
    }
}
