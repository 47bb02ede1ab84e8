//! Admin HTTP surface.
//!
//! Served on its own listener, next to the public router:
//! - `GET /health`  liveness probe
//! - `GET /info`    service name and version
//! - `GET /status`  request statistics of the public router
//! - `GET /metrics` Prometheus exposition
//!
//! When the advanced config key `admin_api_key` is set every route requires
//! `Authorization: Bearer <key>`.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::ConfigStore;
use crate::observability::Stats;
use self::auth::admin_auth_middleware;
use self::handlers::*;

/// State shared by the admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub store: Arc<ConfigStore>,
    pub stats: Arc<Stats>,
    pub prometheus: Option<PrometheusHandle>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/info", get(get_info))
        .route("/status", get(get_status))
        .route("/metrics", get(get_metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
