use crate::domain::BuildEntry;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D];

    /// Tier for an item used by `count` builds. Unused items have no tier.
    pub fn for_count(count: usize) -> Option<Tier> {
        match count {
            30.. => Some(Tier::S),
            20..=29 => Some(Tier::A),
            10..=19 => Some(Tier::B),
            5..=9 => Some(Tier::C),
            1..=4 => Some(Tier::D),
            0 => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemUsage {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierBucket {
    pub tier: Tier,
    pub items: Vec<ItemUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierList {
    pub total_builds: usize,
    pub tiers: Vec<TierBucket>,
}

impl TierList {
    /// Ranks items by how many builds use them; an item counts once per build.
    pub fn from_builds(builds: &[BuildEntry]) -> Self {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for build in builds {
            let distinct: AHashSet<&str> = build.equipment.iter().map(|item| item.name.as_str()).collect();
            for name in distinct {
                *counts.entry(name).or_insert(0) += 1;
            }
        }

        let mut usage: Vec<ItemUsage> = counts
            .into_iter()
            .map(|(name, count)| ItemUsage {
                name: name.to_string(),
                count,
            })
            .collect();
        usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        let tiers = Tier::ALL
            .iter()
            .map(|&tier| TierBucket {
                tier,
                items: usage
                    .iter()
                    .filter(|item| Tier::for_count(item.count) == Some(tier))
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            total_builds: builds.len(),
            tiers,
        }
    }

    pub fn bucket(&self, tier: Tier) -> &[ItemUsage] {
        self.tiers
            .iter()
            .find(|bucket| bucket.tier == tier)
            .map(|bucket| bucket.items.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EquipmentItem;

    fn builds_using(name: &str, count: usize) -> Vec<BuildEntry> {
        (0..count)
            .map(|i| {
                let mut build = BuildEntry::new(format!("Build {i}"), format!("https://x/{name}/{i}"), "Rogue");
                build.equipment.push(EquipmentItem::new(name, "Unique", true, "Gear"));
                build
            })
            .collect()
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(Tier::for_count(30), Some(Tier::S));
        assert_eq!(Tier::for_count(29), Some(Tier::A));
        assert_eq!(Tier::for_count(20), Some(Tier::A));
        assert_eq!(Tier::for_count(10), Some(Tier::B));
        assert_eq!(Tier::for_count(5), Some(Tier::C));
        assert_eq!(Tier::for_count(4), Some(Tier::D));
        assert_eq!(Tier::for_count(1), Some(Tier::D));
        assert_eq!(Tier::for_count(0), None);
    }

    #[test]
    fn items_are_bucketed_and_sorted() {
        let mut builds = builds_using("Grandfather", 30);
        builds.extend(builds_using("Harlequin Crest", 29));
        builds.extend(builds_using("Razorplate", 5));
        builds.extend(builds_using("Band", 5));
        builds.extend(builds_using("Tibault's Will", 1));

        let list = TierList::from_builds(&builds);
        assert_eq!(list.total_builds, 70);
        assert_eq!(list.bucket(Tier::S)[0].name, "Grandfather");
        assert_eq!(list.bucket(Tier::A)[0].count, 29);
        assert!(list.bucket(Tier::B).is_empty());

        let c: Vec<_> = list.bucket(Tier::C).iter().map(|item| item.name.as_str()).collect();
        assert_eq!(c, ["Band", "Razorplate"]);
        assert_eq!(list.bucket(Tier::D)[0].name, "Tibault's Will");
    }

    #[test]
    fn an_item_counts_once_per_build() {
        let mut build = BuildEntry::new("Dup", "https://x/dup", "Druid");
        build.equipment.push(EquipmentItem::new("Grandfather", "Unique", true, "Gear"));
        build.equipment.push(EquipmentItem::new("Grandfather", "Unique", true, "Mentioned"));

        let list = TierList::from_builds(&[build]);
        assert_eq!(list.bucket(Tier::D)[0].count, 1);
    }

    #[test]
    fn empty_catalog_has_empty_tiers() {
        let list = TierList::from_builds(&[]);
        assert_eq!(list.tiers.len(), 5);
        assert!(list.tiers.iter().all(|bucket| bucket.items.is_empty()));
    }
}
