// Authentication and authorization error surface.
//
// Every denial path in the crate flows through `AuthError` so that status
// codes, machine-readable codes and the JSON envelope stay consistent.
// Denials that must not reveal why they happened (missing vs invalid
// token, unknown email vs wrong password) reuse the same variant and
// therefore the same response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use thiserror::Error;

/// Authentication and authorization errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    AuthenticationRequired,

    // Gate-level denial of an authenticated caller
    #[error("Access denied")]
    AccessDenied,

    // Required scope is logged server-side, never echoed to the caller
    #[error("Access denied")]
    InsufficientScope { required: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Token generation failed: {0}")]
    TokenError(String),

    #[error("Internal server error")]
    InternalError,
}

/// Standard error response structure
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
}

impl AuthError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AuthError::AccessDenied => StatusCode::FORBIDDEN,
            AuthError::InsufficientScope { .. } => StatusCode::FORBIDDEN,
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            AuthError::AccessDenied => "ACCESS_DENIED",
            AuthError::InsufficientScope { .. } => "INSUFFICIENT_SCOPE",
            AuthError::ValidationError(_) => "VALIDATION_ERROR",
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::TokenError(_) => "TOKEN_ERROR",
            AuthError::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let response = AuthErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.error_code().to_string(),
                description: self.to_string(),
            },
            message: self.to_string(),
        };

        (status, Json(response)).into_response()
    }
}

/// Log an internal collaborator failure and collapse it to the opaque 500.
/// The detail stays server-side; the client sees only "Internal server error".
pub fn internal_error<E: std::fmt::Display>(context: &str, err: E) -> AuthError {
    tracing::error!("{}: {}", context, err);
    AuthError::InternalError
}

/// Helper function to log authentication failures
pub fn log_auth_failure(
    user_email: &str,
    ip_address: &str,
    error: &AuthError,
    user_agent: Option<&str>,
) {
    tracing::warn!(
        email = user_email,
        ip = ip_address,
        user_agent = user_agent.unwrap_or("unknown"),
        error_code = error.error_code(),
        "Authentication failure"
    );
}

/// Helper function to create audit log entry for authentication events
pub fn create_auth_audit_entry(
    event_type: AuthEventType,
    user_id: Option<&str>,
    email: &str,
    ip_address: &str,
    user_agent: Option<&str>,
    additional_data: Option<serde_json::Value>,
) -> AuthAuditEntry {
    AuthAuditEntry {
        event_type,
        user_id: user_id.map(String::from),
        email: email.to_string(),
        ip_address: ip_address.to_string(),
        user_agent: user_agent.map(String::from),
        timestamp: chrono::Utc::now(),
        additional_data,
    }
}

#[derive(Debug, Serialize)]
pub enum AuthEventType {
    LoginSuccess,
    LoginFailed,
    RegistrationSuccess,
    RegistrationFailed,
    AccessDenied,
}

#[derive(Debug, Serialize)]
pub struct AuthAuditEntry {
    pub event_type: AuthEventType,
    pub user_id: Option<String>,
    pub email: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub additional_data: Option<serde_json::Value>,
}
