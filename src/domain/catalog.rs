use super::build::{BuildEntry, EquipmentItem, SearchMatch};
use serde::{Deserialize, Serialize};

/// The discovered builds and their equipment, persisted as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildCatalog {
    entries: Vec<BuildEntry>,
}

impl BuildCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog keeping the first entry for every url.
    pub fn from_entries(entries: impl IntoIterator<Item = BuildEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.upsert(entry);
        }
        catalog
    }

    pub fn entries(&self) -> &[BuildEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&BuildEntry> {
        self.entries.iter().find(|entry| entry.url == url)
    }

    /// Returns false when a build with the same url is already present.
    pub fn upsert(&mut self, entry: BuildEntry) -> bool {
        if self.get(&entry.url).is_some() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Replaces the equipment of the build at `url`, keeping the first item per name.
    pub fn set_equipment(&mut self, url: &str, items: Vec<EquipmentItem>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.url == url) else {
            return false;
        };

        entry.equipment.clear();
        for item in items {
            if !entry.has_item(&item.name) {
                entry.equipment.push(item);
            }
        }
        true
    }

    /// Every build with an item whose name contains `query` (case-insensitive),
    /// reporting only the first such item per build.
    pub fn search_by_equipment(&self, query: &str) -> Vec<SearchMatch> {
        let needle = query.to_lowercase();

        self.entries
            .iter()
            .filter_map(|build| {
                build
                    .equipment
                    .iter()
                    .find(|item| item.name.to_lowercase().contains(&needle))
                    .map(|item| SearchMatch {
                        title: build.title.clone(),
                        url: build.url.clone(),
                        character_class: build.character_class.clone(),
                        difficulty: build.difficulty.clone(),
                        matched_item: item.name.clone(),
                    })
            })
            .collect()
    }
}
