//! Severity scoring via risk-keyword floors
//!
//! Severity is only ever raised: the scan starts from the citizen-reported
//! level (or Low) and takes the maximum over matched keyword floors, then
//! applies the per-category baseline.

use crate::keywords::RiskTable;
use citywatch_common::db::{Category, Severity};

/// Risk-keyword severity scorer over an injected table
#[derive(Debug, Clone)]
pub struct SeverityScorer {
    table: RiskTable,
}

impl SeverityScorer {
    pub fn new(table: RiskTable) -> Self {
        Self { table }
    }

    /// Score a description. Total: never fails, unmatched input yields the
    /// starting floor (`reported` or Low).
    pub fn score(
        &self,
        description: &str,
        category: Category,
        reported: Option<Severity>,
    ) -> Severity {
        let text = description.to_lowercase();

        let mut severity = reported.unwrap_or(Severity::Low);

        for (phrase, floor) in self.table.floors() {
            if *floor > severity && text.contains(&phrase.to_lowercase()) {
                severity = *floor;
            }
        }

        // Category baseline applies after keyword scanning
        if let Some(baseline) = self.table.baseline_for(category) {
            if baseline > severity {
                severity = baseline;
            }
        }

        severity
    }

    /// The matched risk keyword with the highest floor, if any.
    ///
    /// Used by the ranker to explain which keyword drove the severity in the
    /// rationale text.
    pub fn driving_keyword(&self, description: &str) -> Option<(&str, Severity)> {
        let text = description.to_lowercase();

        self.table
            .floors()
            .iter()
            .filter(|(phrase, _)| text.contains(&phrase.to_lowercase()))
            .max_by_key(|(_, floor)| *floor)
            .map(|(phrase, floor)| (phrase.as_str(), *floor))
    }

    /// Severity floor imposed by a category, if any
    pub fn baseline_for(&self, category: Category) -> Option<Severity> {
        self.table.baseline_for(category)
    }
}

impl Default for SeverityScorer {
    fn default() -> Self {
        Self::new(RiskTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_risk_keywords_yields_low() {
        let scorer = SeverityScorer::default();
        assert_eq!(
            scorer.score("streetlight not working", Category::Road, None),
            Severity::Low
        );
    }

    #[test]
    fn test_keyword_raises_to_its_floor() {
        let scorer = SeverityScorer::default();
        assert_eq!(
            scorer.score("garbage container overflow", Category::Sanitation, None),
            Severity::Medium
        );
        assert_eq!(
            scorer.score("sparking wire near school", Category::Electricity, None),
            Severity::High
        );
        assert_eq!(
            scorer.score("transformer caught fire", Category::Electricity, None),
            Severity::Critical
        );
    }

    #[test]
    fn test_maximum_floor_wins() {
        let scorer = SeverityScorer::default();
        // "burst" (Medium) + "collapse" (Critical) -> Critical
        assert_eq!(
            scorer.score(
                "Water pipe burst flooding the street near collapse risk",
                Category::Water,
                None
            ),
            Severity::Critical
        );
    }

    #[test]
    fn test_monotonic_adding_keywords_never_lowers() {
        let scorer = SeverityScorer::default();
        let base = "drain blocked";
        let more = "drain blocked and flooding";
        let most = "drain blocked and flooding, wall collapse feared";

        let s1 = scorer.score(base, Category::Sanitation, None);
        let s2 = scorer.score(more, Category::Sanitation, None);
        let s3 = scorer.score(most, Category::Sanitation, None);

        assert!(s2 >= s1);
        assert!(s3 >= s2);
    }

    #[test]
    fn test_electricity_baseline_applies() {
        let scorer = SeverityScorer::default();
        // No risk keywords at all, but Electricity floors at Medium
        assert_eq!(
            scorer.score("bill meter reading seems off", Category::Electricity, None),
            Severity::Medium
        );
    }

    #[test]
    fn test_baseline_does_not_lower_keyword_result() {
        let scorer = SeverityScorer::default();
        assert_eq!(
            scorer.score("pole sparking with fire", Category::Electricity, None),
            Severity::Critical
        );
    }

    #[test]
    fn test_reported_severity_is_a_floor_not_a_cap() {
        let scorer = SeverityScorer::default();
        // Citizen reported High; nothing in the text lowers it
        assert_eq!(
            scorer.score("water tastes odd", Category::Water, Some(Severity::High)),
            Severity::High
        );
        // Citizen reported Low; keywords still escalate
        assert_eq!(
            scorer.score("house on fire from wire", Category::Electricity, Some(Severity::Low)),
            Severity::Critical
        );
    }

    #[test]
    fn test_driving_keyword_reports_highest_floor_match() {
        let scorer = SeverityScorer::default();
        let (keyword, floor) = scorer
            .driving_keyword("pipe burst near collapse")
            .unwrap();
        assert_eq!(keyword, "collapse");
        assert_eq!(floor, Severity::Critical);

        assert!(scorer.driving_keyword("quiet street").is_none());
    }

    #[test]
    fn test_custom_table_injection() {
        let table = RiskTable::new(
            vec![("gas smell".to_string(), Severity::Critical)],
            vec![(Category::Water, Severity::High)],
        );
        let scorer = SeverityScorer::new(table);

        assert_eq!(
            scorer.score("strong gas smell in basement", Category::Other, None),
            Severity::Critical
        );
        assert_eq!(scorer.score("anything", Category::Water, None), Severity::High);
    }
}
