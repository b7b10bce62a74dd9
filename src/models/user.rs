// User account records backing the credential directory.
//
// Accounts live behind the `UserDirectory` trait; these structs are the
// records that cross that seam. No persistence concerns leak in here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    /// Scopes granted to tokens issued for this account
    pub scopes: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an account
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub scopes: Vec<String>,
}

/// Scopes granted to every freshly registered account
pub fn default_scopes() -> Vec<String> {
    vec!["profile:read".to_string(), "profile:write".to_string()]
}

impl UserAccount {
    /// Materialize a new account record from registration fields
    pub fn from_new(new_account: NewUserAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: new_account.email,
            password_hash: new_account.password_hash,
            full_name: new_account.full_name,
            scopes: new_account.scopes,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
