//! Per-request statistics middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::http::response::HandlerFailure;
use crate::observability::Stats;

/// Time the wrapped handler and record its outcome in `stats`.
///
/// Handler errors are logged here and never turned into middleware failures.
pub async fn track_requests(
    State(stats): State<Arc<Stats>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(&request).unwrap_or("unknown").to_string();

    let response = next.run(request).await;
    let elapsed = started.elapsed();
    let status = response.status();

    if let Some(HandlerFailure(message)) = response.extensions().get::<HandlerFailure>() {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            error = %message,
            "failed to process request"
        );
    } else {
        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed = ?elapsed,
            "Request handled"
        );
    }

    stats.record_request(status.as_u16(), Some(elapsed));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::HandlerError;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app(stats: Arc<Stats>) -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/missing",
                get(|| async { Err::<&str, _>(HandlerError::NotFound("widget".into())) }),
            )
            .route(
                "/broken",
                get(|| async { Err::<&str, _>(HandlerError::Internal("db down".into())) }),
            )
            .layer(middleware::from_fn_with_state(stats, track_requests))
    }

    async fn call(app: &Router, path: &str) -> StatusCode {
        app.clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn records_every_outcome() {
        let stats = Arc::new(Stats::new());
        let app = app(stats.clone());

        assert_eq!(call(&app, "/ok").await, StatusCode::OK);
        assert_eq!(call(&app, "/ok").await, StatusCode::OK);
        assert_eq!(call(&app, "/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(call(&app, "/broken").await, StatusCode::INTERNAL_SERVER_ERROR);
        // Unrouted paths are 404s from the fallback, still counted.
        assert_eq!(call(&app, "/nowhere").await, StatusCode::NOT_FOUND);

        let requests = stats.snapshot().requests;
        assert_eq!(requests.count, 5);
        assert_eq!(requests.codes.c2xx, 2);
        assert_eq!(requests.codes.c4xx, 2);
        assert_eq!(requests.codes.c5xx, 1);
    }

    #[tokio::test]
    async fn handler_error_body_hides_internal_details() {
        let app = app(Arc::new(Stats::new()));
        let response = app
            .oneshot(Request::builder().uri("/broken").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"internal server error");
    }
}
