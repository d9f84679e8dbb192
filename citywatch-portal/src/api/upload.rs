//! Complaint photo upload

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use citywatch_common::db;

use crate::{ApiError, ApiResult, AppState};

/// Upload response carrying the stored reference
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image_ref: String,
}

/// POST /api/complaints/:id/image
///
/// Raw PNG/JPEG bytes in the request body. One photo per complaint; a
/// second upload replaces the reference (the old file stays on disk, the
/// store is append-only in spirit).
///
/// **Errors:**
/// - 400 Bad Request: empty body or unsupported format
/// - 404 Not Found: unknown tracking ID
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<UploadResponse>> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty image body".to_string()));
    }

    // Reject unknown IDs before writing anything to disk
    if db::fetch_complaint(&state.db, &id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Tracking ID '{}' not found", id)));
    }

    let image_ref = state.images.save(&id, &body)?;
    db::set_image_ref(&state.db, &id, &image_ref).await?;

    info!("Complaint {}: image stored as {}", id, image_ref);

    Ok(Json(UploadResponse { image_ref }))
}
