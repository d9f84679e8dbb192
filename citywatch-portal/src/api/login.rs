//! Admin login and logout
//!
//! A single shared credential guards the dashboard. Success hands out an
//! opaque session token; the credential itself never travels again.

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use citywatch_common::settings::session_timeout_seconds;

use crate::api::auth_middleware::bearer_token;
use crate::{ApiError, ApiResult, AppState};

/// Login request carrying the shared admin credential
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login response: bearer token for the admin endpoints
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_seconds: i64,
}

/// POST /api/admin/login
///
/// **Errors:**
/// - 403 Forbidden: no admin credential configured (login disabled)
/// - 401 Unauthorized: wrong credential
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let expected = state.admin_password.as_deref().ok_or_else(|| {
        ApiError::Forbidden("Admin login is disabled (no credential configured)".to_string())
    })?;

    if payload.password != expected {
        warn!("Failed admin login attempt");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let ttl = session_timeout_seconds(&state.db).await?;
    let token = state.sessions.issue(ttl).await;

    info!("Admin session issued (ttl {}s)", ttl);

    Ok(Json(LoginResponse {
        token,
        expires_in_seconds: ttl,
    }))
}

/// POST /api/admin/logout
///
/// Revokes the session named by the Authorization header. Sits behind the
/// session middleware, so the token is known-valid here.
pub async fn admin_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(&token).await;
    }
    Ok(Json(json!({ "success": true })))
}
