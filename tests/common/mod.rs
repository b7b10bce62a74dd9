// Common test utilities and helper structs
// Shared across all test files to avoid duplication

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, StatusCode},
    Router,
};
use gatekeeper_core::{
    app::AppState,
    app_config::{AppConfig, Environment},
    config::RuleSet,
    models::user::{default_scopes, NewUserAccount, UserAccount},
    pipeline,
    services::{InMemoryUserDirectory, UserDirectory},
    utils::{hash_password_with_config, PasswordConfig},
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

/// Password used for every seeded account unless a test overrides it
pub const TEST_PASSWORD: &str = "SecureP@ssw0rd123!";

/// Origin the test configuration whitelists
pub const TEST_ORIGIN: &str = "http://localhost:5173";

/// Generate a unique email so tests sharing an app never collide
pub fn unique_email(prefix: &str) -> String {
    format!("{}{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Low-cost argon2 parameters so seeding accounts stays fast
pub fn test_password_config() -> PasswordConfig {
    PasswordConfig {
        memory_cost: 4096,
        time_cost: 1,
        parallelism: 1,
        output_length: 32,
    }
}

/// Deterministic configuration, no environment variables involved
pub fn test_config() -> AppConfig {
    AppConfig {
        bind_address: "127.0.0.1:0".to_string(),
        environment: Environment::Test,
        rust_log: "debug".to_string(),
        cors_allowed_origins: vec![TEST_ORIGIN.to_string()],
        jwt_access_secret: "integration-test-secret-at-least-32-chars".to_string(),
        jwt_access_expiry: 3600,
        jwt_audience: "gatekeeper-api".to_string(),
        jwt_issuer: "gatekeeper-core".to_string(),
        jwt_key_version: 1,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub directory: Arc<InMemoryUserDirectory>,
}

impl TestApp {
    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "GET", uri)
    }

    /// Send an OPTIONS request (CORS pre-flight)
    pub fn options(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "OPTIONS", uri)
    }

    /// Send a request with an arbitrary method
    pub fn request(&self, method: &str, uri: &str) -> TestRequest {
        TestRequest::new(self, method, uri)
    }

    /// Issue an access token directly, bypassing the login endpoint
    pub fn issue_token(&self, user_id: &str, email: &str, scopes: &[&str]) -> String {
        self.state
            .jwt_service
            .generate_access_token(
                user_id,
                email,
                scopes.iter().map(|s| s.to_string()).collect(),
            )
            .unwrap()
    }
}

/// Set up the full pipeline with the standard rule table and an empty
/// in-memory directory
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_config(test_config()).await
}

/// Same, but with a caller-supplied configuration
pub async fn setup_test_app_with_config(config: AppConfig) -> TestApp {
    let directory = Arc::new(InMemoryUserDirectory::new());
    let state = AppState::from_config(config)
        .expect("test configuration should build")
        .with_user_directory(directory.clone());
    let app = pipeline::build_router(state.clone());

    TestApp {
        app,
        state,
        directory,
    }
}

/// Same, but with a caller-supplied rule table instead of the standard one
pub async fn setup_test_app_with_rules(rules: RuleSet) -> TestApp {
    let directory = Arc::new(InMemoryUserDirectory::new());
    let state = AppState::from_config(test_config())
        .expect("test configuration should build")
        .with_rules(rules)
        .with_user_directory(directory.clone());
    let app = pipeline::build_router(state.clone());

    TestApp {
        app,
        state,
        directory,
    }
}

/// Insert an account straight into the directory, skipping the register
/// endpoint
pub async fn seed_account(app: &TestApp, email: &str, password: &str) -> UserAccount {
    let password_hash = hash_password_with_config(password, &test_password_config()).unwrap();

    app.directory
        .insert(NewUserAccount {
            email: email.to_string(),
            password_hash,
            full_name: "Test User".to_string(),
            scopes: default_scopes(),
        })
        .await
        .unwrap()
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
    body: Body,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &str, uri: &str) -> Self {
        Self {
            app,
            method: method.to_string(),
            uri: uri.to_string(),
            headers: Vec::new(),
            body: Body::empty(),
        }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        let body_bytes = serde_json::to_vec(body).unwrap();
        self.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        self.body = Body::from(body_bytes);
        self
    }

    /// Add an arbitrary header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach a bearer token
    pub fn bearer(self, token: &str) -> Self {
        let value = format!("Bearer {}", token);
        self.header("authorization", &value)
    }

    /// Set the Origin header
    pub fn origin(self, origin: &str) -> Self {
        self.header("origin", origin)
    }

    /// Send the request through the full pipeline
    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method.as_str()).uri(self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        let mut request = builder.body(self.body).unwrap();

        // ConnectInfo normally comes from the listener; oneshot requests
        // carry it as an extension. Randomized per request so audit lines
        // stay distinguishable in captured logs.
        let ip_address = format!("127.0.0.{}:12345", rand::random::<u8>().saturating_add(1));

        request
            .extensions_mut()
            .insert(ConnectInfo(ip_address.parse::<SocketAddr>().unwrap()));

        let response = self.app.app.clone().oneshot(request).await.unwrap();

        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Read a response header as a string, if present
    pub fn header(&self, name: &str) -> Option<String> {
        self.response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// All values of a response header (Vary can appear more than once)
    pub fn header_all(&self, name: &str) -> Vec<String> {
        self.response
            .headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect()
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Get response body as text
    pub async fn text(self) -> String {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}
