//! Citizen complaint submission
//!
//! Validation happens before the pipeline runs; once past it, classify and
//! score are total, so a submission can only fail on storage.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use citywatch_common::db::{self, Complaint, Severity, Status};
use citywatch_common::time;

use crate::tracking_id::generate_tracking_id;
use crate::{ApiError, ApiResult, AppState};

/// Request payload for filing a complaint
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub description: String,
    pub state: String,
    pub city: String,
    #[serde(default)]
    pub area: Option<String>,
    /// Severity as perceived by the citizen; the pipeline may raise it
    #[serde(default)]
    pub reported_severity: Option<String>,
}

/// Response payload: the tracking ID plus what the pipeline decided
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub tracking_id: String,
    pub category: String,
    pub severity: String,
    pub status: String,
}

/// POST /api/complaints
///
/// **Request:** `{"description": "...", "state": "...", "city": "...",
/// "area": "...", "reported_severity": "Low"}`
///
/// **Errors:**
/// - 400 Bad Request: blank description or location, unknown severity value
/// - 500 Internal Server Error: record store failure
pub async fn submit_complaint(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    // Rejected before the pipeline ever sees the record
    if payload.description.trim().is_empty() {
        return Err(ApiError::BadRequest("Description is required".to_string()));
    }
    if payload.state.trim().is_empty() || payload.city.trim().is_empty() {
        return Err(ApiError::BadRequest("State and city are required".to_string()));
    }

    let reported = match payload.reported_severity.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(Severity::parse_strict(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown severity '{}'", raw))
        })?),
    };

    let category = state.pipeline.classify(&payload.description);
    let severity = state
        .pipeline
        .score_severity(&payload.description, category, reported);

    // The store's primary key enforces uniqueness; retry the draw on the
    // rare collision
    let mut id = generate_tracking_id();
    for _ in 0..4 {
        if !db::tracking_id_exists(&state.db, &id).await? {
            break;
        }
        id = generate_tracking_id();
    }

    let complaint = Complaint {
        id: id.clone(),
        description: payload.description.trim().to_string(),
        category,
        severity,
        state: payload.state.trim().to_string(),
        city: payload.city.trim().to_string(),
        area: payload
            .area
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from),
        image_ref: None,
        status: Status::Open,
        remark: None,
        submitted_at: time::now(),
    };

    db::insert_complaint(&state.db, &complaint).await?;

    info!(
        "Complaint {} registered: {} / {} in {}, {}",
        id, category, severity, complaint.city, complaint.state
    );

    Ok(Json(SubmitResponse {
        tracking_id: id,
        category: category.to_string(),
        severity: severity.to_string(),
        status: Status::Open.to_string(),
    }))
}
