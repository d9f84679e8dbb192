//! Signed image serving
//!
//! Images are only reachable through a time-limited capability: the URL
//! carries an expiry and a signature over (ref, expiry, secret). No
//! signature, no bytes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use citywatch_common::auth::{verify_image_access, ImageAccessError};
use citywatch_common::time;

use crate::images::content_type;
use crate::{ApiError, AppState};

/// Capability parameters attached to an image URL
#[derive(Debug, Deserialize)]
pub struct ImageAccessQuery {
    pub expires: i64,
    pub sig: String,
}

/// GET /images/:image_ref?expires=..&sig=..
///
/// **Errors:**
/// - 403 Forbidden: expired or invalid capability
/// - 404 Not Found: capability valid but no such image
pub async fn serve_image(
    State(state): State<AppState>,
    Path(image_ref): Path<String>,
    Query(access): Query<ImageAccessQuery>,
) -> Result<Response, ApiError> {
    verify_image_access(
        &image_ref,
        access.expires,
        &access.sig,
        state.image_secret,
        time::now().timestamp(),
    )
    .map_err(|e| match e {
        ImageAccessError::Expired { .. } => {
            ApiError::Forbidden("Image link has expired".to_string())
        }
        ImageAccessError::InvalidSignature => {
            ApiError::Forbidden("Invalid image signature".to_string())
        }
        ImageAccessError::DatabaseError(msg) => ApiError::Internal(msg),
    })?;

    let bytes = state
        .images
        .load(&image_ref)?
        .ok_or_else(|| ApiError::NotFound(format!("Image '{}' not found", image_ref)))?;

    Ok((
        StatusCode::OK,
        [("content-type", content_type(&image_ref))],
        bytes,
    )
        .into_response())
}
