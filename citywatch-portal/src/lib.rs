//! citywatch-portal library - single-process civic complaint portal
//!
//! Citizens file and track complaints; admins list, filter, and annotate
//! them. Priority and burst signals are recomputed from the live record
//! snapshot on every dashboard read.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

use citywatch_triage::TriagePipeline;

pub mod api;
pub mod error;
pub mod images;
pub mod sessions;
pub mod tracking_id;

pub use crate::error::{ApiError, ApiResult};
use crate::images::ImageStore;
use crate::sessions::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Complaint record store
    pub db: SqlitePool,
    /// Triage pipeline (fixed keyword tables; thresholds loaded per read)
    pub pipeline: Arc<TriagePipeline>,
    /// Uploaded complaint photos
    pub images: ImageStore,
    /// Live admin sessions
    pub sessions: SessionStore,
    /// Shared admin credential; None disables admin login entirely
    pub admin_password: Option<String>,
    /// Secret behind signed image URLs
    pub image_secret: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        images: ImageStore,
        admin_password: Option<String>,
        image_secret: i64,
    ) -> Self {
        Self {
            db,
            pipeline: Arc::new(TriagePipeline::new()),
            images,
            sessions: SessionStore::new(),
            admin_password,
            image_secret,
        }
    }
}

/// Build application router
///
/// Admin endpoints sit behind the session middleware; everything a citizen
/// touches (submission, tracking, signed image URLs) is public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require a live admin session)
    let protected = Router::new()
        .route("/api/admin/complaints", get(api::dashboard::list_dashboard))
        .route("/api/admin/complaints/:id", post(api::update::update_complaint))
        .route("/api/admin/logout", post(api::login::admin_logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware::require_session,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/", get(api::ui::serve_index))
        .route("/static/app.js", get(api::ui::serve_app_js))
        .route("/api/complaints", post(api::submit::submit_complaint))
        .route("/api/complaints/:id", get(api::track::track_complaint))
        .route("/api/complaints/:id/image", post(api::upload::upload_image))
        .route("/api/admin/login", post(api::login::admin_login))
        .route("/images/:image_ref", get(api::serve_image::serve_image))
        .merge(api::health::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
