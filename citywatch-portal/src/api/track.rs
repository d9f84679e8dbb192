//! Citizen tracking lookup

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use citywatch_common::auth::sign_image_ref;
use citywatch_common::db;
use citywatch_common::settings::image_token_ttl_seconds;
use citywatch_common::time;

use crate::{ApiError, ApiResult, AppState};

/// Response payload for a tracking lookup
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub tracking_id: String,
    pub status: String,
    pub category: String,
    pub severity: String,
    pub state: String,
    pub city: String,
    pub area: Option<String>,
    pub remark: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// Signed, expiring URL for the uploaded photo, when one exists
    pub image_url: Option<String>,
}

/// Build a signed image URL valid for `ttl_seconds` from now
pub fn signed_image_url(image_ref: &str, secret: i64, ttl_seconds: i64) -> String {
    let expires = time::now().timestamp() + ttl_seconds;
    let sig = sign_image_ref(image_ref, expires, secret);
    format!("/images/{}?expires={}&sig={}", image_ref, expires, sig)
}

/// GET /api/complaints/:id
///
/// Citizen status lookup by tracking ID. 404 for unknown IDs.
pub async fn track_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TrackResponse>> {
    let complaint = db::fetch_complaint(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Tracking ID '{}' not found", id)))?;

    let image_url = match &complaint.image_ref {
        Some(image_ref) => {
            let ttl = image_token_ttl_seconds(&state.db).await?;
            Some(signed_image_url(image_ref, state.image_secret, ttl))
        }
        None => None,
    };

    Ok(Json(TrackResponse {
        tracking_id: complaint.id,
        status: complaint.status.to_string(),
        category: complaint.category.to_string(),
        severity: complaint.severity.to_string(),
        state: complaint.state,
        city: complaint.city,
        area: complaint.area,
        remark: complaint.remark,
        submitted_at: complaint.submitted_at,
        image_url,
    }))
}
