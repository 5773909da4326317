use std::sync::OnceLock;

use serde::Deserialize;

use crate::shared::categories::Category;
use crate::shared::matcher::Phrase;

/// A weighted phrase group as written in keywords.toml.
#[derive(Debug, Deserialize)]
struct RawGroup {
    category: String,
    weight: u32,
    phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    scam: Vec<RawGroup>,
    tactic: Vec<RawGroup>,
}

/// One category's weighted phrase list.
pub struct PhraseGroup {
    pub category: Category,
    pub weight: u32,
    pub phrases: Vec<Phrase>,
}

/// An ordered set of weighted phrase groups, scanned in file order.
pub struct WeightedPhraseTable {
    groups: Vec<PhraseGroup>,
}

/// Per-category outcome of a table scan: the phrases that hit, plus the
/// group's weight for the caller's scoring rule to apply.
pub struct CategoryMatch {
    pub category: Category,
    pub weight: u32,
    pub phrases: Vec<&'static str>,
}

impl WeightedPhraseTable {
    pub fn groups(&self) -> &[PhraseGroup] {
        &self.groups
    }

    pub fn group(&self, category: Category) -> Option<&PhraseGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    /// Scan a message against every group, in file order.
    pub fn scan(&'static self, message: &str) -> Vec<CategoryMatch> {
        self.groups
            .iter()
            .filter_map(|group| {
                let phrases: Vec<&'static str> = group
                    .phrases
                    .iter()
                    .filter(|p| p.is_match(message))
                    .map(|p| p.text())
                    .collect();
                if phrases.is_empty() {
                    return None;
                }
                Some(CategoryMatch {
                    category: group.category,
                    weight: group.weight,
                    phrases,
                })
            })
            .collect()
    }
}

static SCAM_TABLE: OnceLock<WeightedPhraseTable> = OnceLock::new();
static TACTIC_TABLE: OnceLock<WeightedPhraseTable> = OnceLock::new();

/// Scam keyword table used by the rule detector.
pub fn scam_table() -> &'static WeightedPhraseTable {
    SCAM_TABLE.get_or_init(|| build_table(load_keywords().scam))
}

/// Manipulation-tactic table used by the tactic classifier.
pub fn tactic_table() -> &'static WeightedPhraseTable {
    TACTIC_TABLE.get_or_init(|| build_table(load_keywords().tactic))
}

fn load_keywords() -> KeywordFile {
    let toml_str = include_str!("../../data/keywords.toml");
    toml::from_str(toml_str).expect("Failed to parse keywords.toml")
}

fn build_table(raw: Vec<RawGroup>) -> WeightedPhraseTable {
    let groups = raw
        .into_iter()
        .map(|group| PhraseGroup {
            category: Category::from_label(&group.category)
                .unwrap_or_else(|| panic!("unknown category in keywords.toml: {}", group.category)),
            weight: group.weight,
            phrases: group.phrases.into_iter().map(Phrase::new).collect(),
        })
        .collect();
    WeightedPhraseTable { groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scam_table_loads_all_groups() {
        let table = scam_table();
        assert_eq!(table.groups().len(), 13);
        let otp = table.group(Category::Otp).unwrap();
        assert_eq!(otp.weight, 18);
        assert!(otp.phrases.iter().any(|p| p.text() == "one time password"));
    }

    #[test]
    fn tactic_table_groups_share_weight() {
        let table = tactic_table();
        assert_eq!(table.groups().len(), 6);
        assert!(table.groups().iter().all(|g| g.weight == 15));
        assert!(table.group(Category::EmotionalManipulation).is_some());
    }

    #[test]
    fn scan_counts_each_category_once() {
        let matches = scam_table().scan("urgent! act now, this is urgent");
        let urgency: Vec<_> = matches
            .iter()
            .filter(|m| m.category == Category::Urgency)
            .collect();
        assert_eq!(urgency.len(), 1);
        assert!(urgency[0].phrases.contains(&"urgent"));
        assert!(urgency[0].phrases.contains(&"act now"));
    }

    #[test]
    fn scan_misses_clean_text() {
        assert!(scam_table().scan("see you at lunch tomorrow").is_empty());
    }
}
