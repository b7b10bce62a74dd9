// Authenticated caller identity.
//
// A Principal is attached to the request by the token-verification stage
// and discarded with the request. Nothing here survives across requests;
// session state is whatever the token itself carries.

use serde::{Deserialize, Serialize};

use crate::models::AccessTokenClaims;
use crate::utils::AuthError;

/// Identity extracted from a verified access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub token_id: String,
    pub email: String,
    pub scope: Vec<String>,
    pub exp: u64,
}

impl Principal {
    /// Build a principal from verified token claims
    pub fn from_claims(claims: AccessTokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            token_id: claims.jti,
            email: claims.email,
            scope: claims.scope,
            exp: claims.exp,
        }
    }

    /// Whether this principal was granted the named scope
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }

    /// Require a scope, turning its absence into a 403.
    ///
    /// Route rules only distinguish anonymous from authenticated; finer
    /// grants are enforced here, inside handlers.
    pub fn authorize_scope(&self, scope: &str) -> Result<(), AuthError> {
        if self.has_scope(scope) {
            return Ok(());
        }

        tracing::warn!(
            user_id = %self.user_id,
            required_scope = scope,
            "Scope authorization failed"
        );

        Err(AuthError::InsufficientScope {
            required: scope.to_string(),
        })
    }
}
