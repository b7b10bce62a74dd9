// Profile endpoint for the authenticated caller.
//
// Reaching this handler means the gate already admitted the request, so a
// Principal is always attached; the extractor rejection is a backstop for
// wiring mistakes, not a path normal traffic takes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    handlers::auth::AuthResponse,
    middleware::Principal,
    services::user_directory::DirectoryError,
    utils::internal_error,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    /// Present when the directory still holds the account
    pub full_name: Option<String>,
    pub scopes: Vec<String>,
    pub token_expires_at: u64,
}

/// GET /api/profile - Identity and grants of the calling principal
pub async fn get_profile(
    State(state): State<AppState>,
    principal: Principal,
) -> impl IntoResponse {
    if let Err(e) = principal.authorize_scope("profile:read") {
        return e.into_response();
    }

    // Sessions are stateless: the token is authoritative for identity, the
    // directory lookup only enriches the answer. A token can outlive its
    // account, so a miss here is not an error.
    let full_name = match state.user_directory.find_by_email(&principal.email).await {
        Ok(account) => Some(account.full_name),
        Err(DirectoryError::NotFound) => None,
        Err(e) => {
            return internal_error("Account lookup failed for profile", e).into_response();
        },
    };

    let profile = ProfileResponse {
        user_id: principal.user_id,
        email: principal.email,
        full_name,
        scopes: principal.scope,
        token_expires_at: principal.exp,
    };

    let response = AuthResponse {
        success: true,
        data: Some(profile),
        message: "Profile retrieved successfully".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
