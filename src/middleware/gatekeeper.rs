// Gatekeeper pipeline stage.
//
// The single place where route-level access is decided. Reads the
// outcome of the rule table for (method, path, principal) and either
// forwards the request or answers with the uniform denial envelope.
// Denials never say whether a credential was absent or merely invalid.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::config::GateOutcome;
use crate::middleware::principal::Principal;
use crate::utils::AuthError;

pub async fn gatekeeper_stage(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let principal = request.extensions().get::<Principal>();
    let outcome = state
        .rules
        .decide(request.method(), request.uri().path(), principal);

    match outcome {
        GateOutcome::Permit | GateOutcome::PermitAnonymous => next.run(request).await,
        GateOutcome::Unauthorized => {
            tracing::warn!(
                method = %request.method(),
                path = request.uri().path(),
                "Request denied: authentication required"
            );
            AuthError::AuthenticationRequired.into_response()
        },
        GateOutcome::Forbidden => {
            tracing::warn!(
                method = %request.method(),
                path = request.uri().path(),
                user_id = principal.map(|p| p.user_id.as_str()).unwrap_or("anonymous"),
                "Request denied: access forbidden"
            );
            AuthError::AccessDenied.into_response()
        },
    }
}
