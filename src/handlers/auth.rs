// Credential login and registration endpoints.
//
// These are the conventional fallback behind the token pipeline: a caller
// holding a valid access token is authenticated before routing and never
// touches them. Both endpoints sit on a PermitAll route, so the handlers
// themselves own every rejection they produce.
//
// Failure parity invariant: unknown email, wrong password and a
// deactivated account all answer with the same 401 body, and the argon2
// verification cost is paid on each of those paths.

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use axum_extra::{headers::UserAgent, TypedHeader};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::OnceLock;
use validator::Validate;

use crate::{
    app::AppState,
    models::user::{default_scopes, NewUserAccount},
    services::user_directory::DirectoryError,
    utils::{
        auth_errors::{create_auth_audit_entry, log_auth_failure, AuthEventType},
        hash_password, internal_error, needs_rehash, normalize_email, trim_and_validate_field,
        verify_password, AuthError, PasswordConfig,
    },
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    pub password_confirmation: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Full name must be between 1 and 255 characters"
    ))]
    pub full_name: String,
}

/// Custom password validation - min 8 chars, must have uppercase, lowercase, number, special char
fn validate_password(password: &str) -> Result<(), validator::ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if password.len() < 8 {
        return Err(validator::ValidationError::new("password_too_short"));
    }

    if !has_uppercase || !has_lowercase || !has_digit || !has_special {
        return Err(validator::ValidationError::new("password_complexity"));
    }

    Ok(())
}

/// Generic envelope for auth endpoint successes
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Seconds until the access token expires
    pub expires_in: u64,
    pub token_type: String,
    pub user: LoginUserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUserInfo {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub message: String,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Hash verified against when the email lookup misses.
///
/// Keeps the argon2 work on the unknown-email path so the lookup outcome
/// does not show up in response timing. Built once with the same default
/// parameters real accounts are hashed with.
fn lookup_miss_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| match hash_password("gatekeeper-lookup-miss") {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::error!("Failed to prepare lookup-miss hash: {}", e);
            None
        },
    })
    .as_deref()
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/auth/login - Verify credentials and issue an access token
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(login_req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_agent = user_agent.map(|TypedHeader(ua)| ua.to_string());
    let ip_address = addr.ip().to_string();

    // Step 1: Normalize the email; a malformed one fails like any bad login
    let email = match normalize_email(&login_req.email) {
        Some(email) => email,
        None => {
            log_auth_failure(
                &login_req.email,
                &ip_address,
                &AuthError::InvalidCredentials,
                user_agent.as_deref(),
            );
            return AuthError::InvalidCredentials.into_response();
        },
    };

    // Step 2: Look up the account
    let account = match state.user_directory.find_by_email(&email).await {
        Ok(account) => account,
        Err(DirectoryError::NotFound) => {
            if let Some(hash) = lookup_miss_hash() {
                let _ = verify_password(&login_req.password, hash);
            }
            log_auth_failure(
                &email,
                &ip_address,
                &AuthError::InvalidCredentials,
                user_agent.as_deref(),
            );
            return AuthError::InvalidCredentials.into_response();
        },
        Err(e) => {
            return internal_error("Account lookup failed during login", e).into_response();
        },
    };

    // Step 3: Verify the password against the stored hash
    match verify_password(&login_req.password, &account.password_hash) {
        Ok(true) => {},
        Ok(false) => {
            log_auth_failure(
                &email,
                &ip_address,
                &AuthError::InvalidCredentials,
                user_agent.as_deref(),
            );
            return AuthError::InvalidCredentials.into_response();
        },
        Err(e) => {
            return internal_error("Password verification failed during login", e).into_response();
        },
    }

    // Step 4: Deactivated accounts answer exactly like bad credentials.
    // Checked after verification so the path costs the same.
    if !account.is_active {
        tracing::warn!(user_id = %account.id, "Login attempt on deactivated account");
        log_auth_failure(
            &email,
            &ip_address,
            &AuthError::InvalidCredentials,
            user_agent.as_deref(),
        );
        return AuthError::InvalidCredentials.into_response();
    }

    // Step 5: Re-encode the credential when the stored work factor is stale.
    // The plaintext is only in hand during login, so this is the one chance.
    // Failures are logged and never block the login itself.
    match needs_rehash(&account.password_hash, &PasswordConfig::default()) {
        Ok(true) => match hash_password(&login_req.password) {
            Ok(new_hash) => {
                if let Err(e) = state
                    .user_directory
                    .update_password_hash(account.id, &new_hash)
                    .await
                {
                    tracing::warn!(user_id = %account.id, "Failed to store rehashed credential: {}", e);
                } else {
                    tracing::info!(user_id = %account.id, "Credential rehashed to current work factor");
                }
            },
            Err(e) => {
                tracing::warn!(user_id = %account.id, "Credential rehash failed: {}", e);
            },
        },
        Ok(false) => {},
        Err(e) => {
            tracing::warn!(user_id = %account.id, "Could not inspect stored hash parameters: {}", e);
        },
    }

    // Step 6: Issue the access token
    let access_token = match state.jwt_service.generate_access_token(
        &account.id.to_string(),
        &account.email,
        account.scopes.clone(),
    ) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            return AuthError::TokenError("Failed to generate access token".to_string())
                .into_response();
        },
    };

    // Step 7: Audit entry and success response
    let audit = create_auth_audit_entry(
        AuthEventType::LoginSuccess,
        Some(&account.id.to_string()),
        &account.email,
        &ip_address,
        user_agent.as_deref(),
        None,
    );
    tracing::info!("Login successful: {:?}", audit);

    let response = AuthResponse {
        success: true,
        data: Some(LoginResponse {
            access_token,
            expires_in: state.jwt_service.access_token_expiry(),
            token_type: "Bearer".to_string(),
            user: LoginUserInfo {
                id: account.id.to_string(),
                email: account.email,
                full_name: account.full_name,
                scopes: account.scopes,
            },
        }),
        message: "Login successful".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/auth/register - Create an account in the user directory
pub async fn register(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(register_req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let user_agent = user_agent.map(|TypedHeader(ua)| ua.to_string());
    let ip_address = addr.ip().to_string();

    // Step 1: Field validation
    if let Err(validation_errors) = register_req.validate() {
        let error_messages: Vec<String> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();

        return AuthError::ValidationError(error_messages.join(", ")).into_response();
    }

    if register_req.password != register_req.password_confirmation {
        return AuthError::ValidationError("Passwords do not match".to_string()).into_response();
    }

    // Step 2: Normalize and trim the identity fields
    let email = match normalize_email(&register_req.email) {
        Some(email) => email,
        None => {
            return AuthError::ValidationError("Invalid email format".to_string()).into_response();
        },
    };

    let full_name = match trim_and_validate_field(&register_req.full_name, true) {
        Ok(name) => name,
        Err(_) => {
            return AuthError::ValidationError("Full name cannot be empty".to_string())
                .into_response();
        },
    };

    // Step 3: Encode the credential
    let password_hash = match hash_password(&register_req.password) {
        Ok(hash) => hash,
        Err(e) => {
            return internal_error("Failed to hash password during registration", e)
                .into_response();
        },
    };

    // Step 4: Insert; the directory owns the duplicate-email check
    let new_account = NewUserAccount {
        email,
        password_hash,
        full_name,
        scopes: default_scopes(),
    };

    let account = match state.user_directory.insert(new_account).await {
        Ok(account) => account,
        Err(DirectoryError::DuplicateEmail) => {
            let audit = create_auth_audit_entry(
                AuthEventType::RegistrationFailed,
                None,
                &register_req.email,
                &ip_address,
                user_agent.as_deref(),
                None,
            );
            tracing::warn!("Registration rejected, email in use: {:?}", audit);
            return AuthError::DuplicateEmail.into_response();
        },
        Err(e) => {
            return internal_error("Failed to create user account", e).into_response();
        },
    };

    // Step 5: Audit entry and created response
    let audit = create_auth_audit_entry(
        AuthEventType::RegistrationSuccess,
        Some(&account.id.to_string()),
        &account.email,
        &ip_address,
        user_agent.as_deref(),
        None,
    );
    tracing::info!("New user registered: {:?}", audit);

    let response = AuthResponse {
        success: true,
        data: Some(RegisterResponse {
            user_id: account.id.to_string(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            message: "Registration successful! You can now log in.".to_string(),
        }),
        message: "User registered successfully".to_string(),
    };

    (StatusCode::CREATED, Json(response)).into_response()
}
