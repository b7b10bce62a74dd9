// Application state and configuration
use std::sync::Arc;

use crate::{
    app_config::AppConfig,
    config::{CorsPolicy, RuleSet},
    services::{InMemoryUserDirectory, JwtConfig, JwtService, UserDirectory},
};

// Application state shared across handlers and pipeline stages.
// Everything here is immutable after startup except the user directory,
// which synchronizes internally.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cors: Arc<CorsPolicy>,
    pub rules: Arc<RuleSet>,
    pub jwt_service: Arc<JwtService>,
    pub user_directory: Arc<dyn UserDirectory>,
}

impl AppState {
    /// Assemble the shared state from loaded configuration.
    ///
    /// Fails when the configured CORS origins do not survive validation;
    /// callers treat that as a startup error.
    pub fn from_config(config: AppConfig) -> Result<Self, crate::app_config::ConfigError> {
        let cors = CorsPolicy::from_config(&config.cors_allowed_origins, &config.environment)?;
        let jwt_service = JwtService::new(JwtConfig::from_app_config(&config));

        Ok(Self {
            config: Arc::new(config),
            cors: Arc::new(cors),
            rules: Arc::new(RuleSet::standard()),
            jwt_service: Arc::new(jwt_service),
            user_directory: Arc::new(InMemoryUserDirectory::new()),
        })
    }

    /// Swap in a different rule table (test scenarios mostly)
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    /// Swap in a different user directory implementation
    pub fn with_user_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.user_directory = directory;
        self
    }
}
