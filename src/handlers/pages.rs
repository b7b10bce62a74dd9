// Top-level pages outside the /api surface.
//
// Everything here sits on a PermitAll route; these answers are what an
// unauthenticated browser poking at the service root gets to see.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde_json::json;

/// GET / - Service descriptor
pub async fn service_descriptor() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gatekeeper-core",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /error - Generic error landing.
///
/// Callers are sent here after a failure elsewhere; the landing itself
/// succeeds, so the status is 200 and the body carries the apology.
pub async fn error_landing() -> impl IntoResponse {
    Json(json!({
        "success": false,
        "error": {
            "code": "ERROR_LANDING",
            "description": "The request could not be completed",
        },
        "message": "The request could not be completed",
    }))
}

/// GET /favicon.ico - Browsers ask for this unprompted; answer without a body
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Fallback for paths no route claims.
///
/// Runs after the gate, so an anonymous caller on an unknown protected
/// path still sees 401, never this 404.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!("No route for {}", uri.path());

    let body = json!({
        "success": false,
        "error": {
            "code": "NOT_FOUND",
            "description": format!("No route for {}", uri.path()),
        },
        "message": "Resource not found",
    });

    (StatusCode::NOT_FOUND, Json(body))
}
