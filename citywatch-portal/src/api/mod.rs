//! HTTP API handlers for the portal

pub mod auth_middleware;
pub mod dashboard;
pub mod health;
pub mod login;
pub mod serve_image;
pub mod submit;
pub mod track;
pub mod ui;
pub mod update;
pub mod upload;

pub use auth_middleware::require_session;
pub use dashboard::list_dashboard;
pub use health::health_routes;
pub use login::{admin_login, admin_logout};
pub use serve_image::serve_image;
pub use submit::submit_complaint;
pub use track::track_complaint;
pub use ui::{serve_app_js, serve_index};
pub use update::update_complaint;
pub use upload::upload_image;
