use once_cell::sync::Lazy;

const KNOWN_UNIQUES: &[&str] = &[
    // Weapons
    "Eaglehorn",
    "Doombringer",
    "Grandfather",
    "Andariel's Visage",
    "Harlequin Crest",
    "The Butcher's Cleaver",
    "Melted Heart of Selig",
    "Maltorius' Petrified Skull",
    // Armor
    "Fists of Fate",
    "Cowl of the Nameless",
    "Penitent Greaves",
    "Shroud of Khanduras",
    "Shroud of False Death",
    "Tyrael's Might",
    "Iceheart Brais",
    "Razorplate",
    "Tassets of the Dawning Sky",
    // Jewelry
    "Ring of Starless Skies",
    "Skull of Garesh",
    "Tibault's Will",
    "Temptation",
    // Mythics
    "Heir of Perdition",
    "Godslayer Crown",
    "Banished Lord's Talisman",
    "Dirge of Melandru",
    "Storm's Companion",
    "Lidless Wall",
    "Wind Striker",
    "Monster Hunter's Glow",
    "Curucle's Favor",
];

static DEFAULT_INDEX: Lazy<KnownItemIndex> =
    Lazy::new(|| KnownItemIndex::new(KNOWN_UNIQUES.iter().copied()));

/// Ordered list of unique item display names with case-insensitive lookups.
#[derive(Debug, Clone)]
pub struct KnownItemIndex {
    names: Vec<String>,
    lowered: Vec<String>,
}

impl KnownItemIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let lowered = names.iter().map(|name| name.to_lowercase()).collect();
        Self { names, lowered }
    }

    /// The built-in list of Diablo 4 uniques and mythics.
    pub fn global() -> &'static KnownItemIndex {
        &DEFAULT_INDEX
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Canonical display name for an exact, case-insensitive match.
    pub fn get(&self, name: &str) -> Option<&str> {
        let needle = name.trim().to_lowercase();
        self.lowered
            .iter()
            .position(|known| *known == needle)
            .map(|i| self.names[i].as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// First known name (in list order) that occurs inside `text`, ignoring case.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.lowered
            .iter()
            .position(|known| haystack.contains(known.as_str()))
            .map(|i| self.names[i].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_ignores_case() {
        let index = KnownItemIndex::global();
        assert_eq!(index.get("tyrael's might"), Some("Tyrael's Might"));
        assert!(index.contains("HARLEQUIN CREST"));
        assert!(!index.contains("Harlequin"));
    }

    #[test]
    fn substring_lookup_returns_display_name() {
        let index = KnownItemIndex::global();
        assert_eq!(
            index.find_in("Slot the shroud of false death in your chest"),
            Some("Shroud of False Death")
        );
        assert_eq!(index.find_in("nothing to see here"), None);
    }

    #[test]
    fn substring_lookup_follows_list_order() {
        let index = KnownItemIndex::new(["Wall", "Lidless Wall"]);
        assert_eq!(index.find_in("the Lidless Wall"), Some("Wall"));
    }
}
