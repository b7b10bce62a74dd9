// HTTP handlers and route builders.
//
// Routes are declared here; whether a request may reach them is decided
// earlier, by the gate stage. Keep the paths in these builders in step
// with the standard rule table in `config::access_rules`.

pub mod auth;
pub mod pages;
pub mod profile;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Routes under /api/auth; the standard rule table leaves these open
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Routes under /api that the default rule protects
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile::get_profile))
}

/// Top-level pages outside the /api prefix
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::service_descriptor))
        .route("/error", get(pages::error_landing))
        .route("/favicon.ico", get(pages::favicon))
}
