// Policy configuration for the gatekeeper

pub mod access_rules;
pub mod cors;

pub use access_rules::{
    AccessDecision, AccessRule, GateOutcome, MethodMatcher, PathMatcher, RuleSet,
};
pub use cors::CorsPolicy;
