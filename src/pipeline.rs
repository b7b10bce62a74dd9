// Request pipeline assembly.
//
// Every request passes the same named stages in a fixed order before any
// handler runs:
//
//   trace -> cors -> token verification -> gate -> router
//
// The contract between stages:
//   - cors answers preflights and stamps response headers; it never
//     authenticates anyone.
//   - token verification attaches a Principal when a valid bearer token is
//     presented and otherwise leaves the request anonymous; it never
//     rejects.
//   - the gate consults the rule table and is the only stage that turns an
//     anonymous caller into a 401. Handlers behind it may still answer 403
//     when a scope is missing.
//
// Reordering these layers changes observable behavior (a preflight must
// not need credentials, a 401 must still carry CORS headers), so the
// stack below is part of the public contract, not plumbing.

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    app::AppState,
    handlers,
    middleware::{cors_stage, gatekeeper_stage, token_verification_stage},
};

/// Assemble the full router with every pipeline stage attached
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", handlers::auth_routes())
        .merge(handlers::api_routes());

    Router::new()
        .merge(handlers::page_routes())
        .nest("/api", api)
        .fallback(handlers::pages::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), cors_stage))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    token_verification_stage,
                ))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    gatekeeper_stage,
                )),
        )
        .with_state(state)
}
