use super::tier_list::TierList;
use super::translation::ItemTranslator;
use crate::domain::{BuildCatalog, BuildEntry, SearchMatch, Storage};
use crate::error::{GearError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub canonical: String,
    pub localized: bool,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub title: String,
    pub url: String,
    #[serde(rename = "class")]
    pub character_class: String,
    pub difficulty: String,
    pub equipment_count: usize,
}

impl From<&BuildEntry> for BuildSummary {
    fn from(build: &BuildEntry) -> Self {
        Self {
            title: build.title.clone(),
            url: build.url.clone(),
            character_class: build.character_class.clone(),
            difficulty: build.difficulty.clone(),
            equipment_count: build.equipment.len(),
        }
    }
}

/// Read side of the persisted catalog. Every call reloads the store so
/// readers observe a refresh as soon as it saves.
pub struct CatalogService {
    store: Arc<dyn Storage>,
    translator: Arc<ItemTranslator>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Storage>, translator: Arc<ItemTranslator>) -> Self {
        Self { store, translator }
    }

    /// The persisted catalog, or an empty one when it is absent or unreadable.
    pub fn catalog(&self) -> BuildCatalog {
        match self.store.load_catalog() {
            Ok(Some(catalog)) => catalog,
            Ok(None) => {
                warn!("No build data yet, serving an empty catalog");
                BuildCatalog::new()
            }
            Err(e) => {
                warn!("Failed to load build data, serving an empty catalog: {}", e);
                BuildCatalog::new()
            }
        }
    }

    pub fn search(&self, query: &str) -> SearchResults {
        search_catalog(&self.catalog(), &self.translator, query)
    }

    pub fn summaries(&self) -> Vec<BuildSummary> {
        self.catalog().entries().iter().map(BuildSummary::from).collect()
    }

    pub fn build(&self, url: &str) -> Result<BuildEntry> {
        self.catalog()
            .get(url)
            .cloned()
            .ok_or_else(|| GearError::NotFound(format!("build {}", url)))
    }

    pub fn tier_list(&self) -> TierList {
        TierList::from_builds(self.catalog().entries())
    }
}

/// Resolves `query` to its canonical English name and searches equipment
/// with it. A blank query matches nothing.
pub fn search_catalog(catalog: &BuildCatalog, translator: &ItemTranslator, query: &str) -> SearchResults {
    let canonical = translator.canonical_name(query);
    let matches = if canonical.name.is_empty() {
        Vec::new()
    } else {
        catalog.search_by_equipment(&canonical.name)
    };
    info!(
        "Search {:?} -> {:?}: {} builds",
        query,
        canonical.name,
        matches.len()
    );

    SearchResults {
        query: query.to_string(),
        canonical: canonical.name,
        localized: canonical.localized,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EquipmentItem, TranslationEntry};
    use crate::services::tier_list::Tier;
    use crate::infrastructure::FileSystemStore;
    use std::fs;

    fn sample_catalog() -> BuildCatalog {
        let mut rogue = BuildEntry::new("Rogue Guide", "https://x/rogue", "Rogue");
        rogue.equipment = vec![
            EquipmentItem::new("Harlequin Crest", "Unique/Legendary", true, "Mentioned"),
            EquipmentItem::new("Grandfather", "Unique/Legendary", true, "Mentioned"),
        ];
        let mut druid = BuildEntry::new("Druid Guide", "https://x/druid", "Druid");
        druid.equipment = vec![EquipmentItem::new("Grandfather", "Unique/Legendary", true, "Gear")];
        BuildCatalog::from_entries([rogue, druid])
    }

    fn service_with(catalog: Option<&BuildCatalog>) -> (tempfile::TempDir, CatalogService) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());
        if let Some(catalog) = catalog {
            store.save_catalog(catalog).unwrap();
        }
        let translator = ItemTranslator::from_entries([TranslationEntry::new("Harlequin Crest", "谐角之冠", "諧角之冠")]);
        (dir, CatalogService::new(Arc::new(store), Arc::new(translator)))
    }

    #[test]
    fn localized_query_finds_builds() {
        let (_dir, service) = service_with(Some(&sample_catalog()));
        let results = service.search("谐角之冠");

        assert_eq!(results.canonical, "Harlequin Crest");
        assert!(results.localized);
        assert_eq!(results.matches.len(), 1);
        assert_eq!(results.matches[0].matched_item, "Harlequin Crest");
    }

    #[test]
    fn search_preserves_build_order() {
        let (_dir, service) = service_with(Some(&sample_catalog()));
        let urls: Vec<_> = service.search("grand").matches.into_iter().map(|m| m.url).collect();
        assert_eq!(urls, ["https://x/rogue", "https://x/druid"]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let (_dir, service) = service_with(Some(&sample_catalog()));
        assert!(service.search("   ").matches.is_empty());
    }

    #[test]
    fn missing_catalog_reads_as_empty() {
        let (_dir, service) = service_with(None);
        assert!(service.search("Grandfather").matches.is_empty());
        assert!(service.summaries().is_empty());
        assert!(matches!(service.build("https://x/rogue"), Err(GearError::NotFound(_))));
    }

    #[test]
    fn corrupt_catalog_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());
        fs::write(store.get_path_for_key("builds_data"), "[{").unwrap();
        let service = CatalogService::new(Arc::new(store), Arc::new(ItemTranslator::default()));
        assert!(service.catalog().is_empty());
    }

    #[test]
    fn summaries_and_tier_list_reflect_the_store() {
        let (_dir, service) = service_with(Some(&sample_catalog()));

        let summaries = service.summaries();
        assert_eq!(summaries[0].equipment_count, 2);
        assert_eq!(service.build("https://x/druid").unwrap().character_class, "Druid");

        let list = service.tier_list();
        assert_eq!(list.bucket(Tier::D)[0].name, "Grandfather");
        assert_eq!(list.bucket(Tier::D)[0].count, 2);
    }
}
