// CORS pipeline stage.
//
// Pre-flight OPTIONS requests are answered here and never travel further
// down the pipeline; everything else is forwarded and the response is
// decorated on the way out. The policy decides which origin, if any, to
// echo; requests from disallowed origins are still served, they just get
// no CORS headers (enforcement is the browser's job).

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderValue},
        Method, Request, Response, StatusCode,
    },
    middleware::Next,
};

use crate::app::AppState;
use crate::config::CorsPolicy;

// Headers permitted when the pre-flight does not name any itself
const DEFAULT_ALLOWED_HEADERS: &str = "content-type, authorization, accept, origin, x-requested-with";

pub async fn cors_stage(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let allowed_origin = state.cors.resolve_origin(origin.as_deref());

    // Pre-flight: answer immediately. 200 regardless of origin; the CORS
    // headers themselves only appear when the origin resolved.
    if req.method() == Method::OPTIONS {
        // With credentials allowed the header list cannot be a literal `*`,
        // so echo whatever the pre-flight asked for.
        let requested_headers = req
            .headers()
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));

        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;

        if let Some(allowed) = allowed_origin {
            if let Ok(origin_value) = HeaderValue::from_str(&allowed) {
                let headers = response.headers_mut();
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(CorsPolicy::ALLOWED_METHODS),
                );
                headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested_headers);
                headers.insert(
                    header::ACCESS_CONTROL_MAX_AGE,
                    HeaderValue::from_static(CorsPolicy::MAX_AGE),
                );
                headers.append(header::VARY, HeaderValue::from_static("Origin"));
            }
        }

        return response;
    }

    // Actual request: forward, then decorate the response
    let mut response = next.run(req).await;

    if let Some(allowed) = allowed_origin {
        if let Ok(origin_value) = HeaderValue::from_str(&allowed) {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }

    response
}
