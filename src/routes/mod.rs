// HTTP + WebSocket routes exposing the timeline

mod http;
mod ws;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::timeline::TimelineManager;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) timeline: TimelineManager,
    pub(crate) config: AppConfig,
}

pub fn app(timeline: TimelineManager, config: AppConfig) -> Router {
    let state = AppState { timeline, config };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/health", get(http::health_handler)) // GET /api/health
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route(
            "/api/timeline",
            get(http::export_handler) // GET /api/timeline
                .post(http::update_handler) // POST /api/timeline
                .delete(http::clear_handler), // DELETE /api/timeline
        )
        .route("/api/timeline/count", get(http::count_handler)) // GET /api/timeline/count
        .route("/ws/timeline", get(ws::ws_timeline)) // WS /ws/timeline
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
