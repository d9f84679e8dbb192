//! # CityWatch Triage Pipeline
//!
//! The rule-based layer that turns raw complaint records into prioritized,
//! explained entries for the admin dashboard:
//! - classification: weighted keyword scoring over a fixed category set
//! - severity scoring: risk-keyword floors plus per-category baselines
//! - burst detection: (category, city) submission-rate spikes
//! - priority ranking: severity + burst + recency with a rationale string
//!
//! The whole pipeline is stateless and idempotent: classification and
//! severity run once at submission; burst detection and ranking are pure
//! functions of (current record snapshot, now) recomputed on every read.
//! All stages are total: unmatched input falls back to `Other`/`Low`,
//! never an error.

pub mod burst;
pub mod classify;
pub mod keywords;
pub mod rank;
pub mod severity;

pub use burst::{detect_bursts, BurstConfig, BurstReport, BurstStat, DataQualityWarning};
pub use classify::Classifier;
pub use keywords::{CategoryTable, RiskTable};
pub use rank::{priority_order, rank, RankConfig, Ranking};
pub use severity::SeverityScorer;

use chrono::{DateTime, Utc};
use citywatch_common::db::{Category, Complaint, Severity};
use citywatch_common::settings::TriageSettings;

/// All pipeline tunables in one place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriageConfig {
    pub burst: BurstConfig,
    pub rank: RankConfig,
}

impl From<&TriageSettings> for TriageConfig {
    fn from(settings: &TriageSettings) -> Self {
        Self {
            burst: BurstConfig {
                recent_window_hours: settings.burst_recent_window_hours,
                baseline_days: settings.burst_baseline_days,
                threshold_min: settings.burst_threshold_min,
                multiplier: settings.burst_multiplier,
            },
            rank: RankConfig {
                weight_severity: settings.priority_weight_severity,
                weight_burst: settings.priority_weight_burst,
                weight_recency: settings.priority_weight_recency,
                recency_half_life_hours: settings.recency_half_life_hours,
            },
        }
    }
}

/// The four pipeline stages bundled behind one handle.
///
/// Keyword tables are fixed at construction; thresholds and weights arrive
/// per call so the portal can reload them from settings on every read.
#[derive(Debug, Clone, Default)]
pub struct TriagePipeline {
    classifier: Classifier,
    scorer: SeverityScorer,
}

impl TriagePipeline {
    /// Pipeline with the built-in keyword tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with custom tables (unit tests, regional deployments)
    pub fn with_tables(category_table: CategoryTable, risk_table: RiskTable) -> Self {
        Self {
            classifier: Classifier::new(category_table),
            scorer: SeverityScorer::new(risk_table),
        }
    }

    /// Classify a complaint description (submission time)
    pub fn classify(&self, description: &str) -> Category {
        self.classifier.classify(description)
    }

    /// Score severity for a classified complaint (submission time)
    pub fn score_severity(
        &self,
        description: &str,
        category: Category,
        reported: Option<Severity>,
    ) -> Severity {
        self.scorer.score(description, category, reported)
    }

    /// Scan the full record snapshot for bursts (read time)
    pub fn detect_bursts(
        &self,
        records: &[Complaint],
        now: DateTime<Utc>,
        config: &BurstConfig,
    ) -> BurstReport {
        detect_bursts(records, now, config)
    }

    /// Rank one complaint against a burst report from the same read
    pub fn rank(
        &self,
        complaint: &Complaint,
        report: &BurstReport,
        now: DateTime<Utc>,
        config: &RankConfig,
    ) -> Ranking {
        rank(complaint, report.stat_for(complaint), now, config, &self.scorer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let settings = TriageSettings {
            burst_recent_window_hours: 12,
            burst_baseline_days: 14,
            burst_threshold_min: 3,
            burst_multiplier: 1.5,
            priority_weight_severity: 2.0,
            priority_weight_burst: 1.0,
            priority_weight_recency: 0.5,
            recency_half_life_hours: 24.0,
        };

        let config = TriageConfig::from(&settings);
        assert_eq!(config.burst.recent_window_hours, 12);
        assert_eq!(config.burst.multiplier, 1.5);
        assert_eq!(config.rank.weight_severity, 2.0);
        assert_eq!(config.rank.recency_half_life_hours, 24.0);
    }

    #[test]
    fn test_default_config_weights_are_ordered() {
        // severity dominates, recency is the tie-breaker
        let config = TriageConfig::default();
        assert!(config.rank.weight_severity >= config.rank.weight_burst);
        assert!(config.rank.weight_burst >= config.rank.weight_recency);
    }

    #[test]
    fn test_submission_stages_compose() {
        let pipeline = TriagePipeline::new();

        let description = "Water pipe burst flooding the street near collapse risk";
        let category = pipeline.classify(description);
        let severity = pipeline.score_severity(description, category, None);

        assert_eq!(category, Category::Water);
        assert_eq!(severity, Severity::Critical);
    }
}
