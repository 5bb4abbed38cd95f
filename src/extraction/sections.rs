use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionCategory {
    MustHave,
    NiceToHave,
    GreatUniques,
    Jackpot,
    BuildDefining,
    LegendariesAndUniques,
    /// Any other heading, kept verbatim.
    Other(String),
}

impl fmt::Display for SectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SectionCategory::MustHave => "Must Have",
            SectionCategory::NiceToHave => "Nice to Have",
            SectionCategory::GreatUniques => "Great Uniques",
            SectionCategory::Jackpot => "Jackpot",
            SectionCategory::BuildDefining => "Build Defining",
            SectionCategory::LegendariesAndUniques => "Legendaries & Uniques",
            SectionCategory::Other(title) => title,
        };
        f.write_str(label)
    }
}

// Hyphens are folded to spaces before matching, so "must have" and "must-have" agree.
const RULES: &[(&str, SectionCategory)] = &[
    ("must have", SectionCategory::MustHave),
    ("nice to have", SectionCategory::NiceToHave),
    ("great uniques", SectionCategory::GreatUniques),
    ("jackpot", SectionCategory::Jackpot),
    ("build defining", SectionCategory::BuildDefining),
    ("legendaries & uniques", SectionCategory::LegendariesAndUniques),
];

pub struct SectionClassifier;

impl SectionClassifier {
    pub fn classify(title: &str) -> SectionCategory {
        let folded = title.to_lowercase().replace('-', " ");

        RULES
            .iter()
            .find(|(needle, _)| folded.contains(needle))
            .map(|(_, category)| category.clone())
            .unwrap_or_else(|| SectionCategory::Other(title.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_titles_map_to_categories() {
        assert_eq!(SectionClassifier::classify("Must-Have Uniques"), SectionCategory::MustHave);
        assert_eq!(SectionClassifier::classify("Nice-to-have items"), SectionCategory::NiceToHave);
        assert_eq!(
            SectionClassifier::classify("Great Uniques for this build"),
            SectionCategory::GreatUniques
        );
        assert_eq!(SectionClassifier::classify("JACKPOT Items"), SectionCategory::Jackpot);
        assert_eq!(
            SectionClassifier::classify("Legendaries & Uniques"),
            SectionCategory::LegendariesAndUniques
        );
    }

    #[test]
    fn precedence_prefers_earlier_rule() {
        assert_eq!(
            SectionClassifier::classify("Must-Have Great Uniques"),
            SectionCategory::MustHave
        );
    }

    #[test]
    fn unknown_title_is_kept_verbatim() {
        let category = SectionClassifier::classify("  Gear & Skills ");
        assert_eq!(category, SectionCategory::Other("Gear & Skills".to_string()));
        assert_eq!(category.to_string(), "Gear & Skills");
    }
}
