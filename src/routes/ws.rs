// WebSocket push of the exported timeline

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use tokio::time::{Duration, MissedTickBehavior, timeout};

use super::AppState;
use crate::timeline::TimelineManager;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_timeline(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let timeline = state.timeline.clone();
    let interval_ms = state.config.publishing.timeline_frequency_ms;
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_timeline(socket, timeline, interval_ms).await {
            tracing::info!(error = %e, "Timeline stream error");
        }
    })
}

async fn stream_timeline(
    mut socket: WebSocket,
    timeline: TimelineManager,
    interval_ms: u64,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to timeline stream");
    let mut tick = tokio::time::interval(Duration::from_millis(interval_ms));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let json = serde_json::to_string(&timeline.export())?;
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    tracing::info!("Client disconnected from timeline stream");
    Ok(())
}
