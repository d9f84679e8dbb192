//! Database models
//!
//! Complaint categories and severities are closed enumerations; parsing is
//! total, falling back to `Other` / `Low` so a hand-edited or legacy row can
//! never take the pipeline down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complaint category assigned by the classifier at submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Water,
    Road,
    Electricity,
    Sanitation,
    Internet,
    Other,
}

impl Category {
    /// Fixed priority order used for classifier tie-breaking and display.
    /// `Other` is last and is never keyword-matched.
    pub const ALL: [Category; 6] = [
        Category::Water,
        Category::Road,
        Category::Electricity,
        Category::Sanitation,
        Category::Internet,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Water => "Water",
            Category::Road => "Road",
            Category::Electricity => "Electricity",
            Category::Sanitation => "Sanitation",
            Category::Internet => "Internet",
            Category::Other => "Other",
        }
    }

    /// Parse a stored category string; unknown values fall back to `Other`
    pub fn parse(s: &str) -> Category {
        match s {
            "Water" => Category::Water,
            "Road" => Category::Road,
            "Electricity" => Category::Electricity,
            "Sanitation" => Category::Sanitation,
            "Internet" => Category::Internet,
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint severity, ordered Low < Medium < High < Critical
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Parse a stored severity string; unknown values fall back to `Low`
    pub fn parse(s: &str) -> Severity {
        match s {
            "Medium" => Severity::Medium,
            "High" => Severity::High,
            "Critical" => Severity::Critical,
            _ => Severity::Low,
        }
    }

    /// Parse a user-supplied severity, rejecting unknown values
    pub fn parse_strict(s: &str) -> Option<Severity> {
        match s {
            "Low" => Some(Severity::Low),
            "Medium" => Some(Severity::Medium),
            "High" => Some(Severity::High),
            "Critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint workflow status; transitions are admin-only and unordered
/// (any state is reachable from any other)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Open,
    InProgress,
    Resolved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }

    /// Parse a stored status string; unknown values fall back to `Open`
    pub fn parse(s: &str) -> Status {
        match s {
            "In Progress" => Status::InProgress,
            "Resolved" => Status::Resolved,
            _ => Status::Open,
        }
    }

    /// Parse a user-supplied status, rejecting unknown values
    pub fn parse_strict(s: &str) -> Option<Status> {
        match s {
            "Open" => Some(Status::Open),
            "In Progress" => Some(Status::InProgress),
            "Resolved" => Some(Status::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complaint record as stored in the record store.
///
/// `priority_score` is deliberately absent: it is recomputed from
/// (severity, burst state, age) on every dashboard read and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// Tracking ID: 8-char uppercase alphanumeric, immutable, never reused
    pub id: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub state: String,
    pub city: String,
    pub area: Option<String>,
    /// Opaque reference into the image store; absent if no photo
    pub image_ref: Option<String>,
    pub status: Status,
    /// Admin free-text remark
    pub remark: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Complaint {
    /// Whether the record carries a usable (city, state) location.
    ///
    /// Records failing this check are excluded from burst partitioning and
    /// reported as data-quality warnings, never as errors.
    pub fn has_valid_location(&self) -> bool {
        !self.city.trim().is_empty() && !self.state.trim().is_empty()
    }
}
