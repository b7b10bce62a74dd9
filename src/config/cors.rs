// Cross-origin policy, fixed at startup.
//
// The allowed-origin list comes from one comma-separated configuration
// string and is validated here so a bad entry stops the service instead
// of silently matching nothing. Matching against the request Origin is
// exact string comparison; a literal `*` entry switches the policy to
// reflecting any origin, but only outside production.

use tracing::debug;
use url::Url;

use crate::app_config::{ConfigError, Environment};

/// Immutable CORS policy shared by every request
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
    reflect_any: bool,
}

impl CorsPolicy {
    /// Methods advertised in pre-flight responses
    pub const ALLOWED_METHODS: &'static str = "GET, POST, PUT, DELETE, OPTIONS";

    /// Pre-flight cache lifetime in seconds
    pub const MAX_AGE: &'static str = "3600";

    /// Build the policy from configured origins.
    ///
    /// Every entry must be `*` or an http(s) origin (`scheme://host[:port]`,
    /// no path, query or fragment). An empty list or a malformed entry is a
    /// startup error.
    pub fn from_config(origins: &[String], environment: &Environment) -> Result<Self, ConfigError> {
        if origins.is_empty() {
            return Err(ConfigError::InvalidValue(
                "CORS_ALLOWED_ORIGINS".to_string(),
                "at least one origin is required".to_string(),
            ));
        }

        let mut allowed_origins = Vec::new();
        let mut has_wildcard = false;

        for entry in origins {
            if entry == "*" {
                has_wildcard = true;
                continue;
            }
            validate_origin(entry)?;
            allowed_origins.push(entry.clone());
        }

        // A wildcard in production is ignored rather than honored: only
        // explicitly listed origins match there.
        let reflect_any = has_wildcard && !environment.is_production();

        Ok(Self {
            allowed_origins,
            reflect_any,
        })
    }

    /// Resolve the request Origin header against the policy.
    ///
    /// Returns the origin value to echo in `Access-Control-Allow-Origin`,
    /// or `None` when the response must carry no CORS headers.
    pub fn resolve_origin(&self, request_origin: Option<&str>) -> Option<String> {
        if self.reflect_any {
            debug!("CORS: Reflecting origin for staging/dev: {:?}", request_origin);
            return request_origin.map(String::from);
        }

        request_origin.and_then(|origin| {
            if self.allowed_origins.iter().any(|allowed| allowed == origin) {
                debug!("CORS: Origin allowed from whitelist: {}", origin);
                Some(origin.to_string())
            } else {
                debug!("CORS: Origin not in whitelist: {}", origin);
                None
            }
        })
    }
}

fn validate_origin(entry: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidValue(
            "CORS_ALLOWED_ORIGINS".to_string(),
            format!("'{}' is not a valid origin: {}", entry, reason),
        )
    };

    let url = Url::parse(entry).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.path() != "/" && !url.path().is_empty() {
        return Err(invalid("origins carry no path"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("origins carry no query or fragment"));
    }

    Ok(())
}
