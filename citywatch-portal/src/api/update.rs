//! Admin status/remark updates
//!
//! Transitions are unordered: Resolved can reopen, Open can resolve
//! directly. Category and severity are submission-time facts and are not
//! editable here.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use citywatch_common::db::{self, Status};

use crate::{ApiError, ApiResult, AppState};

/// Update request; both fields optional, at least one required
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Update response
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub tracking_id: String,
}

/// POST /api/admin/complaints/:id
///
/// **Request:** `{"status": "Resolved", "remark": "Crew dispatched"}`
///
/// **Errors:**
/// - 400 Bad Request: unknown status value, or neither field present
/// - 404 Not Found: unknown tracking ID
pub async fn update_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRequest>,
) -> ApiResult<Json<UpdateResponse>> {
    if payload.status.is_none() && payload.remark.is_none() {
        return Err(ApiError::BadRequest(
            "Provide a status and/or a remark".to_string(),
        ));
    }

    let status = match payload.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(Status::parse_strict(raw).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Unknown status '{}' (expected Open, In Progress, or Resolved)",
                raw
            ))
        })?),
    };

    let found = db::update_complaint(&state.db, &id, status, payload.remark.as_deref()).await?;
    if !found {
        return Err(ApiError::NotFound(format!("Tracking ID '{}' not found", id)));
    }

    info!(
        "Complaint {} updated: status={:?} remark={}",
        id,
        status.map(|s| s.to_string()),
        payload.remark.is_some()
    );

    Ok(Json(UpdateResponse {
        success: true,
        tracking_id: id,
    }))
}
