//! Priority ranking
//!
//! priority = w_severity x severity_weight
//!          + w_burst    x burst_bonus
//!          + w_recency  x recency_weight(age)
//!
//! Weights satisfy w_severity >= w_burst >= w_recency so severity dominates
//! and recency acts as a tie-breaker. The score is recomputed on every read
//! and never persisted.

use crate::burst::BurstStat;
use crate::severity::SeverityScorer;
use chrono::{DateTime, Utc};
use citywatch_common::db::{Complaint, Severity};
use citywatch_common::time::age_hours;
use std::cmp::Ordering;

/// Ranking tunables (see the settings table for deployment defaults)
#[derive(Debug, Clone, PartialEq)]
pub struct RankConfig {
    pub weight_severity: f64,
    pub weight_burst: f64,
    pub weight_recency: f64,
    /// Half-life of the recency decay, in hours
    pub recency_half_life_hours: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            weight_severity: 1.0,
            weight_burst: 0.6,
            weight_recency: 0.4,
            recency_half_life_hours: 48.0,
        }
    }
}

/// Priority score plus its human-readable explanation
#[derive(Debug, Clone)]
pub struct Ranking {
    pub score: f64,
    pub rationale: String,
}

/// Base points per severity level
pub fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 2.0,
        Severity::Medium => 5.0,
        Severity::High => 8.0,
        Severity::Critical => 10.0,
    }
}

/// Points added to every complaint in a flagged partition
pub const BURST_BONUS: f64 = 10.0;

/// Exponential recency decay: a fresh complaint gets 10 points, halving
/// every `half_life_hours`. Never negative, so recency can only ever add.
pub fn recency_weight(age_hours: f64, half_life_hours: f64) -> f64 {
    if half_life_hours <= 0.0 {
        return 0.0;
    }
    10.0 * 0.5_f64.powf(age_hours / half_life_hours)
}

/// Rank one complaint against the current burst report.
///
/// `burst` is the complaint's partition stat from the same scan (None for
/// records excluded from partitioning). The rationale names the factors
/// that actually contributed.
pub fn rank(
    complaint: &Complaint,
    burst: Option<&BurstStat>,
    now: DateTime<Utc>,
    config: &RankConfig,
    scorer: &SeverityScorer,
) -> Ranking {
    let in_burst = burst.map_or(false, |stat| stat.flagged);

    let age = age_hours(now, complaint.submitted_at);
    let score = config.weight_severity * severity_weight(complaint.severity)
        + config.weight_burst * if in_burst { BURST_BONUS } else { 0.0 }
        + config.weight_recency * recency_weight(age, config.recency_half_life_hours);

    let rationale = build_rationale(complaint, burst.filter(|stat| stat.flagged), scorer);

    Ranking { score, rationale }
}

fn build_rationale(
    complaint: &Complaint,
    burst: Option<&BurstStat>,
    scorer: &SeverityScorer,
) -> String {
    let severity = complaint.severity;

    // Credit whichever input actually produced the stored severity: the
    // strongest matched keyword, or the category baseline, or neither.
    let severity_clause = match scorer.driving_keyword(&complaint.description) {
        Some((keyword, floor)) if floor == severity => {
            format!("{} severity due to keyword '{}'", severity, keyword)
        }
        _ => match scorer.baseline_for(complaint.category) {
            Some(baseline) if baseline == severity => {
                format!("{} severity from {} category baseline", severity, complaint.category)
            }
            _ => format!("{} severity", severity),
        },
    };

    match burst {
        Some(stat) => format!(
            "{}; part of a burst of {} complaints in {} for {} in the last {}h",
            severity_clause, stat.recent_count, stat.city, stat.category, stat.window_hours
        ),
        None => severity_clause,
    }
}

/// Total order for the priority view: higher score first; equal scores go
/// to the earlier submission (first-come precedence among equals).
pub fn priority_order(
    a_score: f64,
    a_submitted: DateTime<Utc>,
    b_score: f64,
    b_submitted: DateTime<Utc>,
) -> Ordering {
    b_score
        .total_cmp(&a_score)
        .then_with(|| a_submitted.cmp(&b_submitted))
}
