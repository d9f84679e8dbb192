//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Age of `then` relative to `now`, in fractional hours.
///
/// Returns 0.0 for timestamps in the future so that clock skew between a
/// submitting client and the dashboard read never produces negative ages.
pub fn age_hours(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    let secs = (now - then).num_milliseconds() as f64 / 1000.0;
    (secs / 3600.0).max(0.0)
}
