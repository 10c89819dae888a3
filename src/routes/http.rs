// HTTP handlers: version, health, metrics, timeline export/count/clear/update

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::error::MetricsError;
use crate::metrics;
use crate::models::PerfStat;
use crate::version::{NAME, VERSION};

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/health: whether the timeline still accepts updates.
pub(super) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "active": state.timeline.active() }))
}

/// GET /api/timeline: captured history, oldest first.
pub(super) async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.timeline.export())
}

/// GET /metrics: Prometheus text format rendered from the captured window.
pub(super) async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Response, MetricsError> {
    let body = metrics::render(&state.timeline.export())?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response())
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to encode metrics");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
    }
}

/// GET /api/timeline/count
pub(super) async fn count_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "count": state.timeline.count_stats() }))
}

/// DELETE /api/timeline: drops history, keeps the container registry.
pub(super) async fn clear_handler(State(state): State<AppState>) -> StatusCode {
    state.timeline.clear();
    StatusCode::NO_CONTENT
}

/// POST /api/timeline: sparse update from an external producer.
pub(super) async fn update_handler(
    State(state): State<AppState>,
    Json(stat): Json<PerfStat>,
) -> Response {
    match state.timeline.update(stat) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
