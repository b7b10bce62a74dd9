// Route access policy for the request gatekeeper.
//
// Rules form an ordered table evaluated first-match-wins, with an explicit
// default decision at the end instead of an implicit fallthrough. The whole
// table is built once at startup and never mutated, so every request sees
// the same policy and `decide` stays a pure function of its arguments.

use axum::http::Method;

use crate::middleware::principal::Principal;

/// Path pattern for an access rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Matches exactly one path
    Exact(String),
    /// Matches a path and everything below it, on segment boundaries:
    /// `/api/auth` covers `/api/auth` and `/api/auth/login` but not
    /// `/api/authz`
    Prefix(String),
    /// Matches every path
    Any,
}

impl PathMatcher {
    pub fn exact(path: impl Into<String>) -> Self {
        PathMatcher::Exact(path.into())
    }

    /// Prefix matcher; trailing slashes are trimmed so `/api/auth/` and
    /// `/api/auth` declare the same rule.
    pub fn prefix(path: impl Into<String>) -> Self {
        let path: String = path.into();
        PathMatcher::Prefix(path.trim_end_matches('/').to_string())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Exact(expected) => path == expected,
            PathMatcher::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
            PathMatcher::Any => true,
        }
    }
}

/// HTTP method pattern for an access rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    /// Matches every method
    Any,
    /// Matches one method
    Only(Method),
}

impl MethodMatcher {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatcher::Any => true,
            MethodMatcher::Only(expected) => method == expected,
        }
    }
}

/// What a matched rule demands of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Anyone may pass, authenticated or not
    PermitAll,
    /// Only requests carrying a verified principal may pass
    RequireAuthenticated,
}

/// One entry in the rule table
#[derive(Debug, Clone)]
pub struct AccessRule {
    pub method: MethodMatcher,
    pub path: PathMatcher,
    pub decision: AccessDecision,
}

impl AccessRule {
    pub fn new(method: MethodMatcher, path: PathMatcher, decision: AccessDecision) -> Self {
        Self {
            method,
            path,
            decision,
        }
    }
}

/// Outcome of the gatekeeper decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Pass through with an attached principal
    Permit,
    /// Pass through without a principal
    PermitAnonymous,
    /// Denied: authentication required and none present (HTTP 401)
    Unauthorized,
    /// Denied: authenticated but lacking a required grant (HTTP 403).
    /// Route rules never produce this; scope checks inside handlers do.
    Forbidden,
}

/// Ordered access rules plus the explicit default for unmatched requests
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<AccessRule>,
    default_decision: AccessDecision,
}

impl RuleSet {
    pub fn new(rules: Vec<AccessRule>, default_decision: AccessDecision) -> Self {
        Self {
            rules,
            default_decision,
        }
    }

    /// The service's standard route policy.
    ///
    /// Declaration order is load-bearing: the OPTIONS rule sits first so
    /// pre-flight requests pass regardless of what later rules protect.
    /// Everything not explicitly opened up requires authentication.
    pub fn standard() -> Self {
        Self::new(
            vec![
                AccessRule::new(
                    MethodMatcher::Only(Method::OPTIONS),
                    PathMatcher::Any,
                    AccessDecision::PermitAll,
                ),
                AccessRule::new(
                    MethodMatcher::Any,
                    PathMatcher::exact("/"),
                    AccessDecision::PermitAll,
                ),
                AccessRule::new(
                    MethodMatcher::Any,
                    PathMatcher::exact("/error"),
                    AccessDecision::PermitAll,
                ),
                AccessRule::new(
                    MethodMatcher::Any,
                    PathMatcher::exact("/favicon.ico"),
                    AccessDecision::PermitAll,
                ),
                AccessRule::new(
                    MethodMatcher::Any,
                    PathMatcher::prefix("/api/auth"),
                    AccessDecision::PermitAll,
                ),
            ],
            AccessDecision::RequireAuthenticated,
        )
    }

    /// Look up the decision for a request: first matching rule wins,
    /// the default applies when nothing matches.
    pub fn evaluate(&self, method: &Method, path: &str) -> AccessDecision {
        for rule in &self.rules {
            if rule.method.matches(method) && rule.path.matches(path) {
                return rule.decision;
            }
        }
        self.default_decision
    }

    /// Decide whether a request passes the gate.
    ///
    /// Pure function of the rule table and its arguments; evaluating the
    /// same request twice yields the same outcome.
    pub fn decide(
        &self,
        method: &Method,
        path: &str,
        principal: Option<&Principal>,
    ) -> GateOutcome {
        match (self.evaluate(method, path), principal) {
            (AccessDecision::PermitAll, Some(_)) => GateOutcome::Permit,
            (AccessDecision::PermitAll, None) => GateOutcome::PermitAnonymous,
            (AccessDecision::RequireAuthenticated, Some(_)) => GateOutcome::Permit,
            (AccessDecision::RequireAuthenticated, None) => GateOutcome::Unauthorized,
        }
    }
}
