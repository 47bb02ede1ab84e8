use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::admin::AdminState;
use crate::config::keys::ADMIN_API_KEY;
use crate::http::HandlerError;

/// Require the configured bearer token, if one is configured.
///
/// The key is read on every request so a reload takes effect immediately.
pub async fn admin_auth_middleware(
    State(state): State<AdminState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let api_key = state.store.get(ADMIN_API_KEY);
    let api_key = api_key.as_str();
    if api_key.is_empty() {
        return next.run(request).await;
    }

    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == api_key);

    if authorized {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request");
        HandlerError::Unauthorized.into_response()
    }
}
