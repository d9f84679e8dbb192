//! Admin dashboard listing
//!
//! Every request re-reads the full record snapshot, re-runs burst detection
//! and ranking at the current instant, then filters and sorts. Priority is
//! never cached or persisted, so the listing always reflects live burst
//! state.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use citywatch_common::db;
use citywatch_common::settings::{image_token_ttl_seconds, TriageSettings};
use citywatch_common::time;
use citywatch_triage::{priority_order, BurstStat, DataQualityWarning, TriageConfig};

use crate::api::track::signed_image_url;
use crate::{ApiError, ApiResult, AppState};

/// Dashboard query parameters: filter predicates plus the sort key
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// "priority" (default), "latest", or "oldest"
    #[serde(default)]
    pub sort: Option<String>,
}

/// One dashboard row: the stored record plus everything recomputed at read
/// time
#[derive(Debug, Serialize)]
pub struct DashboardEntry {
    pub tracking_id: String,
    pub description: String,
    pub category: String,
    pub severity: String,
    pub state: String,
    pub city: String,
    pub area: Option<String>,
    pub status: String,
    pub remark: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// Derived on this read; not persisted
    pub priority_score: f64,
    pub rationale: String,
    pub burst: bool,
    pub image_url: Option<String>,
}

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total: usize,
    pub sort: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<DashboardEntry>,
    /// Flagged (category, city) partitions, largest first
    pub bursts: Vec<BurstStat>,
    /// Records excluded from burst analysis (bad location etc.)
    pub warnings: Vec<DataQualityWarning>,
}

/// GET /api/admin/complaints
///
/// **Query:** `?state=&city=&category=&status=&sort=priority|latest|oldest`
///
/// **Errors:**
/// - 400 Bad Request: unknown sort key
/// - 500 Internal Server Error: record store failure
pub async fn list_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardResponse>> {
    let sort = query.sort.as_deref().unwrap_or("priority");
    if !matches!(sort, "priority" | "latest" | "oldest") {
        return Err(ApiError::BadRequest(format!(
            "Unknown sort '{}' (expected priority, latest, or oldest)",
            sort
        )));
    }

    let now = time::now();
    let settings = TriageSettings::load(&state.db).await?;
    let config = TriageConfig::from(&settings);

    let records = db::list_complaints(&state.db).await?;
    let report = state.pipeline.detect_bursts(&records, now, &config.burst);

    if !report.warnings.is_empty() {
        warn!(
            "{} complaint(s) excluded from burst analysis for data-quality reasons",
            report.warnings.len()
        );
    }

    let image_ttl = image_token_ttl_seconds(&state.db).await?;

    let mut entries: Vec<DashboardEntry> = Vec::new();
    for complaint in &records {
        if !matches_filters(complaint, &query) {
            continue;
        }

        let ranking = state.pipeline.rank(complaint, &report, now, &config.rank);
        let image_url = complaint
            .image_ref
            .as_deref()
            .map(|image_ref| signed_image_url(image_ref, state.image_secret, image_ttl));

        entries.push(DashboardEntry {
            tracking_id: complaint.id.clone(),
            description: complaint.description.clone(),
            category: complaint.category.to_string(),
            severity: complaint.severity.to_string(),
            state: complaint.state.clone(),
            city: complaint.city.clone(),
            area: complaint.area.clone(),
            status: complaint.status.to_string(),
            remark: complaint.remark.clone(),
            submitted_at: complaint.submitted_at,
            priority_score: ranking.score,
            rationale: ranking.rationale,
            burst: report.is_burst(complaint),
            image_url,
        });
    }

    match sort {
        // Highest score first; equal scores surface the older complaint
        "priority" => entries.sort_by(|a, b| {
            priority_order(a.priority_score, a.submitted_at, b.priority_score, b.submitted_at)
        }),
        "latest" => entries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at)),
        "oldest" => entries.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at)),
        _ => unreachable!(),
    }

    let bursts = report.flagged().into_iter().cloned().collect();

    Ok(Json(DashboardResponse {
        total: entries.len(),
        sort: sort.to_string(),
        generated_at: now,
        entries,
        bursts,
        warnings: report.warnings,
    }))
}

fn matches_filters(complaint: &citywatch_common::db::Complaint, query: &DashboardQuery) -> bool {
    let matches = |filter: &Option<String>, value: &str| match filter.as_deref() {
        None | Some("") | Some("All") => true,
        Some(wanted) => wanted.eq_ignore_ascii_case(value.trim()),
    };

    matches(&query.state, &complaint.state)
        && matches(&query.city, &complaint.city)
        && matches(&query.category, complaint.category.as_str())
        && matches(&query.status, complaint.status.as_str())
}
