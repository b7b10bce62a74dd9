// Library exports for the gatekeeper service
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, ConfigError, Environment};
pub use config::{
    AccessDecision, AccessRule, CorsPolicy, GateOutcome, MethodMatcher, PathMatcher, RuleSet,
};
pub use middleware::Principal;
pub use models::auth::AccessTokenClaims;
pub use pipeline::build_router;
pub use services::{InMemoryUserDirectory, JwtConfig, JwtError, JwtService, UserDirectory};
pub use utils::{AuthError, AuthErrorResponse};

// Re-export handler route builders
pub use handlers::{api_routes, auth_routes, page_routes};
