//! Complaint classification via weighted keyword scoring

use crate::keywords::CategoryTable;
use citywatch_common::db::Category;

/// Keyword classifier over an injected category table
#[derive(Debug, Clone)]
pub struct Classifier {
    table: CategoryTable,
}

impl Classifier {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// Classify a free-text description.
    ///
    /// Each category is scored by summing weight x occurrence-count over its
    /// keywords (case-insensitive substring match). The highest non-zero
    /// score wins; equal scores resolve to the category listed first in the
    /// table. No keyword match at all yields `Other`. Total: never fails.
    pub fn classify(&self, description: &str) -> Category {
        let text = description.to_lowercase();

        let mut best: Option<(Category, u32)> = None;
        for (category, keywords) in self.table.entries() {
            let score: u32 = keywords
                .iter()
                .map(|(phrase, weight)| occurrences(&text, phrase) * weight)
                .sum();

            // Strict > keeps the earlier entry on ties (fixed priority order)
            if score > 0 && best.map_or(true, |(_, s)| score > s) {
                best = Some((*category, score));
            }
        }

        best.map(|(category, _)| category).unwrap_or(Category::Other)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(CategoryTable::default())
    }
}

/// Non-overlapping occurrence count of `phrase` in lowercased `text`
fn occurrences(text: &str, phrase: &str) -> u32 {
    if phrase.is_empty() {
        return 0;
    }
    text.matches(&phrase.to_lowercase()).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category_keywords_classify_to_it() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("Dirty water leaking from a broken pipe"), Category::Water);
        assert_eq!(classifier.classify("Huge pothole on the main road"), Category::Road);
        assert_eq!(classifier.classify("Transformer sparking near the pole"), Category::Electricity);
        assert_eq!(classifier.classify("Garbage dump overflowing, terrible smell"), Category::Sanitation);
        assert_eq!(classifier.classify("Broadband down, no wifi signal"), Category::Internet);
    }

    #[test]
    fn test_no_keywords_falls_back_to_other() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("The municipal office is always closed"), Category::Other);
        assert_eq!(classifier.classify(""), Category::Other);
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("WATER PIPE LEAK"), Category::Water);
    }

    #[test]
    fn test_highest_score_wins_across_categories() {
        let classifier = Classifier::default();
        // "street" alone scores Road 1; "pipe" + "flood" score Water 4
        assert_eq!(
            classifier.classify("Water pipe burst flooding the street"),
            Category::Water
        );
    }

    #[test]
    fn test_tie_breaks_by_table_order() {
        // Both categories score exactly 1; Water is listed first
        let table = CategoryTable::new(vec![
            (Category::Water, vec![("wet".to_string(), 1)]),
            (Category::Road, vec![("cracked".to_string(), 1)]),
        ]);
        let classifier = Classifier::new(table);
        assert_eq!(classifier.classify("wet and cracked"), Category::Water);
    }

    #[test]
    fn test_repeated_keyword_counts_each_occurrence() {
        let table = CategoryTable::new(vec![
            (Category::Road, vec![("pothole".to_string(), 1)]),
            (Category::Water, vec![("leak".to_string(), 3)]),
        ]);
        let classifier = Classifier::new(table);
        // pothole x4 = 4 beats leak x1 = 3
        assert_eq!(
            classifier.classify("pothole after pothole after pothole after pothole, plus a leak"),
            Category::Road
        );
    }

    #[test]
    fn test_custom_table_injection() {
        let table = CategoryTable::new(vec![(
            Category::Internet,
            vec![("router".to_string(), 1)],
        )]);
        let classifier = Classifier::new(table);
        assert_eq!(classifier.classify("the router is on fire"), Category::Internet);
        // Default-table words mean nothing to a custom table
        assert_eq!(classifier.classify("water pipe leak"), Category::Other);
    }
}
