// Access token issuance and verification, HS256.
//
// Tokens are self-contained: validation needs only the shared secret and
// the expected audience/issuer, never a store lookup. Expiry is checked
// with zero leeway. The key version travels in the JWT `kid` header so a
// future secret rotation can tell old tokens from new ones.

use jsonwebtoken::{decode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::app_config::AppConfig;
use crate::models::auth::AccessTokenClaims;

// Error types for JWT operations
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("System clock error: {0}")]
    ClockError(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken => JwtError::InvalidToken,
            _ => JwtError::EncodingError(err.to_string()),
        }
    }
}

/// Signing and validation settings for access tokens
#[derive(Clone)]
pub struct JwtConfig {
    pub access_token_expiry: u64,
    pub algorithm: Algorithm,

    /// Expected audience for issued and accepted tokens
    pub audience: String,
    /// Token issuer identifier
    pub issuer: String,

    pub access_encoding_key: EncodingKey,
    pub access_decoding_key: DecodingKey,

    /// Key versioning for rotation
    pub key_version: u32,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("access_encoding_key", &"<redacted>")
            .field("access_decoding_key", &"<redacted>")
            .field("key_version", &self.key_version)
            .finish()
    }
}

impl JwtConfig {
    /// Build JWT config from explicit parameters
    pub fn from_params(
        access_secret: &str,
        access_expiry: u64,
        audience: String,
        issuer: String,
        key_version: u32,
    ) -> Self {
        let access_encoding_key = EncodingKey::from_secret(access_secret.as_bytes());
        let access_decoding_key = DecodingKey::from_secret(access_secret.as_bytes());

        JwtConfig {
            access_token_expiry: access_expiry,
            algorithm: Algorithm::HS256,
            audience,
            issuer,
            access_encoding_key,
            access_decoding_key,
            key_version,
        }
    }

    /// Build JWT config from loaded application configuration
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::from_params(
            &config.jwt_access_secret,
            config.jwt_access_expiry,
            config.jwt_audience.clone(),
            config.jwt_issuer.clone(),
            config.jwt_key_version,
        )
    }

    /// Deterministic config for unit tests
    #[cfg(test)]
    pub fn for_test() -> Self {
        Self::from_params(
            "test-access-secret-for-unit-tests-32ch",
            3600,
            "gatekeeper-api".to_string(),
            "gatekeeper-core".to_string(),
            1,
        )
    }
}

/// Stateless JWT service
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    /// Create new JWT service with configuration
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Seconds an issued token stays valid
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Generate access token
    pub fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
        scope: Vec<String>,
    ) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| JwtError::ClockError(e.to_string()))?
            .as_secs();

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            email: email.to_string(),
            scope,
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        let mut header = Header::new(self.config.algorithm);
        header.kid = Some(self.config.key_version.to_string());

        jsonwebtoken::encode(&header, &claims, &self.config.access_encoding_key)
            .map_err(Into::into)
    }

    /// Validate an access token and return the decoded claims.
    ///
    /// Signature, audience, issuer and expiry (leeway 0) are all checked;
    /// any failure maps to `TokenExpired` or `InvalidToken`/`EncodingError`.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data =
            decode::<AccessTokenClaims>(token, &self.config.access_decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}
