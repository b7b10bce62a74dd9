// Token-verification pipeline stage.
//
// Reads the bearer token, validates it, and attaches a Principal to the
// request on success. This stage never rejects: a missing or invalid
// token leaves the request anonymous and the gatekeeper stage decides
// what that means for the route. Collapsing both cases there keeps the
// denial responses indistinguishable to callers.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::middleware::principal::Principal;
use crate::utils::AuthError;

pub async fn token_verification_stage(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.jwt_service.validate_access_token(token) {
            Ok(claims) => {
                request
                    .extensions_mut()
                    .insert(Principal::from_claims(claims));
            },
            Err(e) => {
                // Anonymous from here on; the gate produces the 401
                tracing::warn!("Bearer token rejected: {}", e);
            },
        }
    }

    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor for the verified caller identity.
///
/// Handlers behind a require-authenticated rule can take `Principal`
/// directly; the rejection exists for handlers reachable outside the
/// gate, where no principal may be present.
impl FromRequestParts<AppState> for Principal {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::AuthenticationRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);

        // Scheme is case-sensitive, matching the issued header exactly
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), None);
    }
}
