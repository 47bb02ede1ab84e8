use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::admin::AdminState;
use crate::http::HandlerError;
use crate::observability::StatsSnapshot;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

pub async fn get_health() -> &'static str {
    "ok"
}

pub async fn get_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn get_status(State(state): State<AdminState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}

pub async fn get_metrics(
    State(state): State<AdminState>,
) -> Result<impl IntoResponse, HandlerError> {
    let handle = state
        .prometheus
        .as_ref()
        .ok_or_else(|| HandlerError::NotFound("metrics recorder not installed".into()))?;
    Ok((
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
