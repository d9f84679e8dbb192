//! Keyword tables for classification and severity scoring
//!
//! Both tables are immutable configuration data injected at pipeline
//! construction. Tests swap in custom tables; production uses the built-in
//! defaults below.

use citywatch_common::db::{Category, Severity};

/// Weighted keyword table mapping categories to phrases.
///
/// Entry order is significant: it is the fixed tie-break priority order for
/// classification (earlier categories win equal scores). `Other` carries no
/// keywords and is the no-match fallback.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<(Category, Vec<(String, u32)>)>,
}

impl CategoryTable {
    pub fn new(entries: Vec<(Category, Vec<(String, u32)>)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(Category, Vec<(String, u32)>)] {
        &self.entries
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        // Distinctive phrases carry weight 2, generic ones weight 1, so a
        // description mentioning "pothole" twice beats one stray "street".
        let table: &[(Category, &[(&str, u32)])] = &[
            (
                Category::Water,
                &[
                    ("leak", 2),
                    ("pipe", 2),
                    ("sewage", 2),
                    ("flood", 2),
                    ("tap", 1),
                    ("water", 1),
                    ("supply", 1),
                ],
            ),
            (
                Category::Road,
                &[
                    ("pothole", 3),
                    ("asphalt", 2),
                    ("speed breaker", 2),
                    ("footpath", 2),
                    ("road", 1),
                    ("street", 1),
                    ("bump", 1),
                ],
            ),
            (
                Category::Electricity,
                &[
                    ("transformer", 2),
                    ("power cut", 2),
                    ("exposed wire", 2),
                    ("spark", 2),
                    ("shock", 2),
                    ("wire", 1),
                    ("pole", 1),
                    ("current", 1),
                    ("streetlight", 1),
                ],
            ),
            (
                Category::Sanitation,
                &[
                    ("garbage", 2),
                    ("trash", 2),
                    ("dump", 2),
                    ("drain", 2),
                    ("manhole", 2),
                    ("smell", 1),
                    ("waste", 1),
                ],
            ),
            (
                Category::Internet,
                &[
                    ("internet", 2),
                    ("broadband", 2),
                    ("fiber", 2),
                    ("wifi", 2),
                    ("network", 1),
                    ("signal", 1),
                ],
            ),
        ];

        Self::new(
            table
                .iter()
                .map(|(category, keywords)| {
                    (
                        *category,
                        keywords
                            .iter()
                            .map(|(phrase, weight)| (phrase.to_string(), *weight))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Risk keyword table for severity scoring.
///
/// Each phrase maps to a severity floor; scanning a description raises the
/// working severity to the highest matched floor. Category baselines apply
/// after keyword scanning.
#[derive(Debug, Clone)]
pub struct RiskTable {
    floors: Vec<(String, Severity)>,
    baselines: Vec<(Category, Severity)>,
}

impl RiskTable {
    pub fn new(floors: Vec<(String, Severity)>, baselines: Vec<(Category, Severity)>) -> Self {
        Self { floors, baselines }
    }

    pub fn floors(&self) -> &[(String, Severity)] {
        &self.floors
    }

    /// Severity floor imposed by a category, if any
    pub fn baseline_for(&self, category: Category) -> Option<Severity> {
        self.baselines
            .iter()
            .find(|(cat, _)| *cat == category)
            .map(|(_, floor)| *floor)
    }
}

impl Default for RiskTable {
    fn default() -> Self {
        let floors: &[(&str, Severity)] = &[
            ("fire", Severity::Critical),
            ("death", Severity::Critical),
            ("collapse", Severity::Critical),
            ("electrocut", Severity::Critical),
            ("danger", Severity::High),
            ("sparking", Severity::High),
            ("exposed wire", Severity::High),
            ("flooding", Severity::High),
            ("accident", Severity::High),
            ("open manhole", Severity::High),
            ("burst", Severity::Medium),
            ("overflow", Severity::Medium),
            ("blocked", Severity::Medium),
        ];

        // Electricity never goes out below Medium: even a routine report
        // carries shock risk
        let baselines = vec![(Category::Electricity, Severity::Medium)];

        Self::new(
            floors
                .iter()
                .map(|(phrase, floor)| (phrase.to_string(), *floor))
                .collect(),
            baselines,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_all_keyword_categories() {
        let table = CategoryTable::default();
        let categories: Vec<Category> = table.entries().iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            vec![
                Category::Water,
                Category::Road,
                Category::Electricity,
                Category::Sanitation,
                Category::Internet,
            ]
        );
        // Other is the fallback, never keyword-matched
        assert!(!categories.contains(&Category::Other));
    }

    #[test]
    fn test_electricity_baseline_is_medium() {
        let table = RiskTable::default();
        assert_eq!(table.baseline_for(Category::Electricity), Some(Severity::Medium));
        assert_eq!(table.baseline_for(Category::Water), None);
    }
}
