// Integration tests: HTTP endpoints over a live timeline

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{container, cpu_stat, full_stat};
use perfwatch::config::AppConfig;
use perfwatch::models::{PerfStat, Timeline};
use perfwatch::routes;
use perfwatch::timeline::TimelineManager;
use tokio_util::sync::CancellationToken;

const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[timeline]
interval_ms = 20
capacity = 4

[monitoring]
sample_interval_ms = 1000
stats_log_interval_secs = 60
docker_enabled = false

[publishing]
timeline_frequency_ms = 50
"#;

fn test_app() -> (TestServer, TimelineManager, CancellationToken) {
    let config = AppConfig::load_from_str(TEST_CONFIG).unwrap();
    let cancel = CancellationToken::new();
    let timeline = TimelineManager::create(
        cancel.clone(),
        config.timeline.interval_ms,
        config.timeline.capacity,
        full_stat(),
    )
    .unwrap();
    let server = TestServer::new(routes::app(timeline.clone(), config));
    (server, timeline, cancel)
}

/// Build TestServer with http_transport (required for WebSocket tests).
fn test_app_with_http() -> (TestServer, TimelineManager, CancellationToken) {
    let config = AppConfig::load_from_str(TEST_CONFIG).unwrap();
    let cancel = CancellationToken::new();
    let timeline = TimelineManager::create(
        cancel.clone(),
        config.timeline.interval_ms,
        config.timeline.capacity,
        full_stat(),
    )
    .unwrap();
    let server = TestServer::builder()
        .http_transport()
        .build(routes::app(timeline.clone(), config));
    (server, timeline, cancel)
}

async fn wait_ms(ms: u64) {
    tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await;
}

#[tokio::test]
async fn test_version_endpoint() {
    let (server, _, _) = test_app();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("perfwatch")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_health_reflects_cancellation() {
    let (server, _, cancel) = test_app();
    let json: serde_json::Value = server.get("/api/health").await.json();
    assert_eq!(json["active"], true);

    cancel.cancel();
    let json: serde_json::Value = server.get("/api/health").await.json();
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn test_posted_update_shows_up_in_export() {
    let (server, _, _) = test_app();
    let update = PerfStat {
        cpu: Some(cpu_stat(77.0)),
        c_event: Some(vec![container("new", "worker")]),
        ..Default::default()
    };
    server
        .post("/api/timeline")
        .json(&update)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    wait_ms(70).await;

    let response = server.get("/api/timeline").await;
    response.assert_status_ok();
    let timeline: Timeline = response.json();
    assert_eq!(timeline.interval, 20);
    assert!(!timeline.stats.is_empty());
    assert!(timeline.stats.len() <= 4);
    let last = timeline.stats.last().unwrap();
    assert_eq!(last.cpu, Some(cpu_stat(77.0)));
    assert_eq!(last.mem, full_stat().mem);
    assert!(timeline.c_info.contains_key("c1"));
    assert!(timeline.c_info.contains_key("new"));
}

#[tokio::test]
async fn test_count_and_clear_after_close() {
    let (server, timeline, cancel) = test_app();
    wait_ms(70).await;
    cancel.cancel();
    timeline.join().await;

    let json: serde_json::Value = server.get("/api/timeline/count").await.json();
    let count = json["count"].as_u64().unwrap();
    assert!(count >= 1);
    assert_eq!(count as usize, timeline.count_stats());

    server
        .delete("/api/timeline")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let json: serde_json::Value = server.get("/api/timeline/count").await.json();
    assert_eq!(json["count"], 0);
    let exported: Timeline = server.get("/api/timeline").await.json();
    assert!(exported.stats.is_empty());
    assert!(exported.c_info.contains_key("c1"));
}

#[tokio::test]
async fn test_update_after_close_is_unavailable() {
    let (server, _, cancel) = test_app();
    cancel.cancel();

    let response = server
        .post("/api/timeline")
        .json(&PerfStat {
            cpu: Some(cpu_stat(1.0)),
            ..Default::default()
        })
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = response.json();
    assert_eq!(json["error"], "perf timeline manager is closed");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prometheus_text() {
    let (server, _, _) = test_app();
    wait_ms(70).await;

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));

    let text = response.text();
    for name in [
        "cpu_usage_per_core{core=\"0\"} 12.5",
        "cpu_usage_percent_count",
        "memory_total_bytes 16384",
        "memory_used_bytes 4096",
        "memory_available_bytes 12288",
        "container_cpu_usage_percent{id=\"c1\"} 1.5",
        "container_memory_used_bytes{id=\"c1\"} 64",
        "timeline_snapshots",
    ] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
}

// --- WebSocket tests (require http_transport + ws feature) ---
// Receive until we get valid JSON (server may send Ping first).

async fn receive_first_json_text<T: serde::de::DeserializeOwned>(
    ws: &mut axum_test::TestWebSocket,
) -> T {
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    loop {
        let text = ws.receive_text().await;
        if let Ok(v) = serde_json::from_str::<T>(&text) {
            return v;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for JSON"
        );
    }
}

#[tokio::test]
async fn test_ws_timeline_receives_json() {
    let (server, timeline, _) = test_app_with_http();
    let mut ws = server
        .get_websocket("/ws/timeline")
        .await
        .into_websocket()
        .await;

    let pushed: Timeline = receive_first_json_text(&mut ws).await;
    let exported = timeline.export();
    assert_eq!(pushed.interval, exported.interval);
    assert_eq!(pushed.c_info, exported.c_info);
    assert!(pushed.c_info.contains_key("c1"));
    assert!(pushed.stats.len() <= 4);
}
