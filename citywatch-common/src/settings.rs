//! Typed access to the settings table
//!
//! Triage thresholds and weights are deployment tunables, not compile-time
//! constants. The dashboard reloads them on every read so an admin can
//! adjust the burst rule without a restart.

use crate::Result;
use sqlx::SqlitePool;
use tracing::warn;

/// Triage pipeline tunables loaded from the settings table
#[derive(Debug, Clone, PartialEq)]
pub struct TriageSettings {
    /// Trailing window counted by the burst detector, in hours
    pub burst_recent_window_hours: i64,
    /// Baseline period preceding the recent window, in days
    pub burst_baseline_days: i64,
    /// Minimum recent count below which no partition is ever flagged
    pub burst_threshold_min: i64,
    /// Baseline-average multiplier in the burst threshold rule
    pub burst_multiplier: f64,
    /// Weight of the severity term in the priority score
    pub priority_weight_severity: f64,
    /// Weight of the burst term in the priority score
    pub priority_weight_burst: f64,
    /// Weight of the recency term in the priority score
    pub priority_weight_recency: f64,
    /// Half-life of the recency decay, in hours
    pub recency_half_life_hours: f64,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            burst_recent_window_hours: 24,
            burst_baseline_days: 7,
            burst_threshold_min: 5,
            burst_multiplier: 2.0,
            priority_weight_severity: 1.0,
            priority_weight_burst: 0.6,
            priority_weight_recency: 0.4,
            recency_half_life_hours: 48.0,
        }
    }
}

impl TriageSettings {
    /// Load triage settings, falling back to defaults for missing or
    /// unparseable values
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            burst_recent_window_hours: get_i64(
                pool,
                "burst_recent_window_hours",
                defaults.burst_recent_window_hours,
            )
            .await?,
            burst_baseline_days: get_i64(pool, "burst_baseline_days", defaults.burst_baseline_days)
                .await?,
            burst_threshold_min: get_i64(pool, "burst_threshold_min", defaults.burst_threshold_min)
                .await?,
            burst_multiplier: get_f64(pool, "burst_multiplier", defaults.burst_multiplier).await?,
            priority_weight_severity: get_f64(
                pool,
                "priority_weight_severity",
                defaults.priority_weight_severity,
            )
            .await?,
            priority_weight_burst: get_f64(
                pool,
                "priority_weight_burst",
                defaults.priority_weight_burst,
            )
            .await?,
            priority_weight_recency: get_f64(
                pool,
                "priority_weight_recency",
                defaults.priority_weight_recency,
            )
            .await?,
            recency_half_life_hours: get_f64(
                pool,
                "recency_half_life_hours",
                defaults.recency_half_life_hours,
            )
            .await?,
        })
    }
}

/// Session timeout for admin logins, in seconds
pub async fn session_timeout_seconds(pool: &SqlitePool) -> Result<i64> {
    get_i64(pool, "session_timeout_seconds", 86400).await
}

/// Validity period of signed image URLs, in seconds
pub async fn image_token_ttl_seconds(pool: &SqlitePool) -> Result<i64> {
    get_i64(pool, "image_token_ttl_seconds", 3600).await
}

async fn get_raw(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(value.flatten())
}

async fn get_i64(pool: &SqlitePool, key: &str, default: i64) -> Result<i64> {
    match get_raw(pool, key).await? {
        Some(raw) => match raw.parse::<i64>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!("Setting '{}' has non-integer value '{}', using default {}", key, raw, default);
                Ok(default)
            }
        },
        None => Ok(default),
    }
}

async fn get_f64(pool: &SqlitePool, key: &str, default: f64) -> Result<f64> {
    match get_raw(pool, key).await? {
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!("Setting '{}' has non-numeric value '{}', using default {}", key, raw, default);
                Ok(default)
            }
        },
        None => Ok(default),
    }
}
