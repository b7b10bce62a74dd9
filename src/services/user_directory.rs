// User account directory behind a trait seam.
//
// Login and registration talk to `UserDirectory`, never to a concrete
// store. The in-memory implementation ships as the process-local backend;
// a persistent one would implement the same trait and surface its failures
// through `DirectoryError::Backend`.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::user::{NewUserAccount, UserAccount};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Account not found")]
    NotFound,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Directory backend error: {0}")]
    Backend(String),
}

/// Credential store seam consulted by login and registration.
///
/// Emails are compared case-insensitively; callers pass them already
/// normalized (`utils::normalize_email`).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<UserAccount, DirectoryError>;

    async fn insert(&self, new_account: NewUserAccount) -> Result<UserAccount, DirectoryError>;

    async fn update_password_hash(
        &self,
        account_id: Uuid,
        password_hash: &str,
    ) -> Result<(), DirectoryError>;
}

/// Process-local account store keyed by normalized email
#[derive(Default)]
pub struct InMemoryUserDirectory {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an account's active flag. An administrative operation on the
    /// concrete store, not part of the `UserDirectory` seam.
    pub async fn set_active(&self, account_id: Uuid, active: bool) -> Result<(), DirectoryError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .values_mut()
            .find(|a| a.id == account_id)
            .ok_or(DirectoryError::NotFound)?;

        account.is_active = active;
        account.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<UserAccount, DirectoryError> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&email.to_lowercase())
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    async fn insert(&self, new_account: NewUserAccount) -> Result<UserAccount, DirectoryError> {
        let key = new_account.email.to_lowercase();
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&key) {
            return Err(DirectoryError::DuplicateEmail);
        }

        let account = UserAccount::from_new(new_account);
        accounts.insert(key, account.clone());
        Ok(account)
    }

    async fn update_password_hash(
        &self,
        account_id: Uuid,
        password_hash: &str,
    ) -> Result<(), DirectoryError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .values_mut()
            .find(|a| a.id == account_id)
            .ok_or(DirectoryError::NotFound)?;

        account.password_hash = password_hash.to_string();
        account.updated_at = chrono::Utc::now();
        Ok(())
    }
}
