//! Burst detection over (category, city) partitions
//!
//! A burst is an abnormal concentration of same-category complaints in one
//! city within a trailing window. Detection is a pure function of
//! (record snapshot, now, config): nothing is persisted, and every dashboard
//! read recomputes from the live snapshot. The read is not transactionally
//! isolated from concurrent submissions; a record landing mid-scan shows up
//! on the next read.

use chrono::{DateTime, Duration, Utc};
use citywatch_common::db::{Category, Complaint};
use serde::Serialize;
use std::collections::HashMap;

/// Burst detector tunables (see the settings table for deployment defaults)
#[derive(Debug, Clone, PartialEq)]
pub struct BurstConfig {
    /// Trailing window counted for the recent rate, in hours
    pub recent_window_hours: i64,
    /// Baseline period preceding the recent window, in days
    pub baseline_days: i64,
    /// Minimum recent count below which no partition is flagged
    pub threshold_min: i64,
    /// Baseline-average multiplier
    pub multiplier: f64,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            recent_window_hours: 24,
            baseline_days: 7,
            threshold_min: 5,
            multiplier: 2.0,
        }
    }
}

/// Per-partition burst statistics
#[derive(Debug, Clone, Serialize)]
pub struct BurstStat {
    pub category: Category,
    /// Display form of the city (first seen spelling, trimmed)
    pub city: String,
    /// Complaints in the trailing recent window
    pub recent_count: i64,
    /// Mean per-recent-window count over the baseline period
    pub baseline_average: f64,
    /// The count the recent window had to exceed:
    /// max(threshold_min, multiplier x baseline_average)
    pub threshold: f64,
    pub flagged: bool,
    pub window_hours: i64,
}

/// A record excluded from burst partitioning for data-quality reasons.
/// This is a warning, never an error: the record itself stays stored and
/// listed.
#[derive(Debug, Clone, Serialize)]
pub struct DataQualityWarning {
    pub tracking_id: String,
    pub message: String,
}

/// Result of a burst scan: per-partition stats plus data-quality warnings
#[derive(Debug, Clone, Default)]
pub struct BurstReport {
    stats: HashMap<(Category, String), BurstStat>,
    pub warnings: Vec<DataQualityWarning>,
}

impl BurstReport {
    /// Partition statistics for a complaint, or None when the complaint has
    /// no usable location (such records are never part of any burst)
    pub fn stat_for(&self, complaint: &Complaint) -> Option<&BurstStat> {
        if !complaint.has_valid_location() {
            return None;
        }
        self.stats
            .get(&(complaint.category, partition_city(&complaint.city)))
    }

    /// Whether a complaint belongs to a flagged partition
    pub fn is_burst(&self, complaint: &Complaint) -> bool {
        self.stat_for(complaint).map_or(false, |stat| stat.flagged)
    }

    /// All flagged partitions, largest recent count first
    pub fn flagged(&self) -> Vec<&BurstStat> {
        let mut flagged: Vec<&BurstStat> =
            self.stats.values().filter(|stat| stat.flagged).collect();
        flagged.sort_by(|a, b| {
            b.recent_count
                .cmp(&a.recent_count)
                .then_with(|| a.city.cmp(&b.city))
        });
        flagged
    }
}

fn partition_city(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Scan the full record snapshot for submission-rate spikes.
///
/// For each (category, city) partition, the recent-window count is compared
/// against `max(threshold_min, multiplier x baseline_average)` where the
/// baseline average is the partition's mean count per recent-window-length
/// over the preceding `baseline_days`. Deterministic for a fixed
/// (records, now, config).
pub fn detect_bursts(
    records: &[Complaint],
    now: DateTime<Utc>,
    config: &BurstConfig,
) -> BurstReport {
    let recent_start = now - Duration::hours(config.recent_window_hours);
    let baseline_start = recent_start - Duration::days(config.baseline_days);

    struct Partition {
        city_display: String,
        recent: i64,
        baseline: i64,
    }

    let mut partitions: HashMap<(Category, String), Partition> = HashMap::new();
    let mut warnings = Vec::new();

    for record in records {
        if !record.has_valid_location() {
            warnings.push(DataQualityWarning {
                tracking_id: record.id.clone(),
                message: "missing or blank location; excluded from burst analysis".to_string(),
            });
            continue;
        }

        let key = (record.category, partition_city(&record.city));
        let partition = partitions.entry(key).or_insert_with(|| Partition {
            city_display: record.city.trim().to_string(),
            recent: 0,
            baseline: 0,
        });

        if record.submitted_at > recent_start && record.submitted_at <= now {
            partition.recent += 1;
        } else if record.submitted_at > baseline_start && record.submitted_at <= recent_start {
            partition.baseline += 1;
        }
    }

    // Number of recent-window-lengths inside the baseline period
    let baseline_windows =
        (config.baseline_days as f64 * 24.0) / (config.recent_window_hours.max(1) as f64);

    let stats = partitions
        .into_iter()
        .map(|((category, city_key), partition)| {
            let baseline_average = if baseline_windows > 0.0 {
                partition.baseline as f64 / baseline_windows
            } else {
                0.0
            };
            let threshold =
                (config.threshold_min as f64).max(config.multiplier * baseline_average);
            let flagged = partition.recent as f64 > threshold;

            (
                (category, city_key),
                BurstStat {
                    category,
                    city: partition.city_display,
                    recent_count: partition.recent,
                    baseline_average,
                    threshold,
                    flagged,
                    window_hours: config.recent_window_hours,
                },
            )
        })
        .collect();

    BurstReport { stats, warnings }
}
