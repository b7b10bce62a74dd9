// Integration tests for the CORS stage: origin resolution, pre-flight
// answers and header decoration on real responses.

use axum::http::StatusCode;
use gatekeeper_core::app_config::Environment;
use serde_json::Value;

mod common;
use common::{setup_test_app, setup_test_app_with_config, test_config, TEST_ORIGIN};

#[tokio::test]
async fn test_allowed_origin_reflected_on_simple_request() {
    let app = setup_test_app().await;

    let response = app.get("/").origin(TEST_ORIGIN).send().await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some(TEST_ORIGIN)
    );
    assert_eq!(
        response.header("access-control-allow-credentials").as_deref(),
        Some("true")
    );
    assert!(response
        .header_all("vary")
        .iter()
        .any(|v| v.contains("Origin")));
}

#[tokio::test]
async fn test_disallowed_origin_still_served_without_cors_headers() {
    let app = setup_test_app().await;

    let response = app.get("/").origin("http://evil.example.com").send().await;

    // The request itself is answered; only the browser-facing grant is
    // withheld
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), None);
    assert_eq!(response.header("access-control-allow-credentials"), None);
}

#[tokio::test]
async fn test_request_without_origin_gets_no_cors_headers() {
    let app = setup_test_app().await;

    let response = app.get("/").send().await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), None);
}

#[tokio::test]
async fn test_preflight_answers_with_policy() {
    let app = setup_test_app().await;

    let response = app
        .options("/api/profile")
        .origin(TEST_ORIGIN)
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "content-type, x-custom-header")
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some(TEST_ORIGIN)
    );
    assert_eq!(
        response.header("access-control-allow-methods").as_deref(),
        Some("GET, POST, PUT, DELETE, OPTIONS")
    );
    // Credential-compatible echo of exactly what the browser asked for
    assert_eq!(
        response.header("access-control-allow-headers").as_deref(),
        Some("content-type, x-custom-header")
    );
    assert_eq!(
        response.header("access-control-max-age").as_deref(),
        Some("3600")
    );
    assert_eq!(
        response.header("access-control-allow-credentials").as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn test_preflight_without_requested_headers_advertises_defaults() {
    let app = setup_test_app().await;

    let response = app
        .options("/api/auth/login")
        .origin(TEST_ORIGIN)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-headers").as_deref(),
        Some("content-type, authorization, accept, origin, x-requested-with")
    );
}

#[tokio::test]
async fn test_preflight_from_disallowed_origin_is_bare_200() {
    let app = setup_test_app().await;

    let response = app
        .options("/api/profile")
        .origin("http://evil.example.com")
        .send()
        .await;

    // Pre-flights never fail outright, they just come back without grants
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), None);
    assert_eq!(response.header("access-control-allow-methods"), None);
}

#[tokio::test]
async fn test_unauthorized_response_still_carries_cors_headers() {
    let app = setup_test_app().await;

    let response = app.get("/api/profile").origin(TEST_ORIGIN).send().await;

    // The gate's 401 passes back through the CORS stage, so the browser
    // can actually read the error body
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some(TEST_ORIGIN)
    );

    let body: Value = response.json().await;
    assert_eq!(body["error"]["code"], "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn test_anonymous_public_request_carries_grant_in_same_response() {
    let app = setup_test_app().await;

    // One anonymous request under /api/auth from the allowed origin must
    // show both halves at once: no gate rejection, and the CORS grant on
    // that very response
    let response = app.get("/api/auth/login").origin(TEST_ORIGIN).send().await;

    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    // Login is only routed for POST, so routing answers 405; the point is
    // the rejection did not come from the gate
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some(TEST_ORIGIN)
    );
    assert_eq!(
        response.header("access-control-allow-credentials").as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn test_wildcard_reflects_any_origin_outside_production() {
    let mut config = test_config();
    config.cors_allowed_origins = vec!["*".to_string()];
    let app = setup_test_app_with_config(config).await;

    let response = app
        .get("/")
        .origin("http://some-random-host:9999")
        .send()
        .await;

    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("http://some-random-host:9999")
    );
}

#[tokio::test]
async fn test_wildcard_is_ignored_in_production() {
    let mut config = test_config();
    config.environment = Environment::Production;
    config.cors_allowed_origins = vec!["*".to_string(), "https://app.example.com".to_string()];
    let app = setup_test_app_with_config(config).await;

    let reflected = app
        .get("/")
        .origin("http://some-random-host:9999")
        .send()
        .await;
    assert_eq!(reflected.header("access-control-allow-origin"), None);

    let listed = app.get("/").origin("https://app.example.com").send().await;
    assert_eq!(
        listed.header("access-control-allow-origin").as_deref(),
        Some("https://app.example.com")
    );
}
