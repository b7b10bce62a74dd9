// Utility modules for the gatekeeper

pub mod auth_errors;
pub mod password;
pub mod validation;

pub use auth_errors::{
    create_auth_audit_entry, internal_error, log_auth_failure, AuthAuditEntry, AuthError,
    AuthErrorResponse, AuthEventType,
};
pub use password::{
    hash_password, hash_password_with_config, needs_rehash, verify_password, PasswordConfig,
    PasswordError,
};
pub use validation::{normalize_email, trim_and_validate_field};
