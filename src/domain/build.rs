use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEntry {
    pub title: String,
    pub url: String,
    #[serde(rename = "class")]
    pub character_class: String,
    #[serde(default = "BuildEntry::default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
}

impl BuildEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>, character_class: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            character_class: character_class.into(),
            difficulty: Self::default_difficulty(),
            tags: BTreeSet::new(),
            equipment: Vec::new(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.equipment.iter().any(|item| item.name == name)
    }

    fn default_difficulty() -> String {
        "Medium".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub is_unique: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl EquipmentItem {
    pub fn new(
        name: impl Into<String>,
        item_type: impl Into<String>,
        is_unique: bool,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            item_type: item_type.into(),
            is_unique,
            category: category.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Well-known values of [`EquipmentItem::item_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Weapon,
    Armor,
    Jewelry,
    LegendaryAspect,
    Unique,
    UniqueLegendary,
    Detected,
    Unknown,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Weapon => "Weapon",
            ItemType::Armor => "Armor",
            ItemType::Jewelry => "Jewelry",
            ItemType::LegendaryAspect => "Legendary Aspect",
            ItemType::Unique => "Unique",
            ItemType::UniqueLegendary => "Unique/Legendary",
            ItemType::Detected => "Unique/Legendary (Detected)",
            ItemType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One build surfaced by an equipment search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub title: String,
    pub url: String,
    #[serde(rename = "class")]
    pub character_class: String,
    pub difficulty: String,
    pub matched_item: String,
}
