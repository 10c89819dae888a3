use anyhow::Result;
use perfwatch::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let cancel = CancellationToken::new();

    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new());
    let initial = sysinfo_repo
        .sample()
        .await
        .map_err(|e| anyhow::anyhow!("initial host sample: {}", e))?;
    let timeline = timeline::TimelineManager::create(
        cancel.clone(),
        app_config.timeline.interval_ms,
        app_config.timeline.capacity,
        initial,
    )?;

    let docker_repo = if app_config.monitoring.docker_enabled {
        match docker_repo::DockerRepo::connect() {
            Ok(repo) => Some(Arc::new(repo)),
            Err(e) => {
                tracing::warn!(error = %e, "Docker unavailable; container stats disabled");
                None
            }
        }
    } else {
        None
    };

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            sysinfo_repo,
            docker_repo,
            timeline: timeline.clone(),
            cancel: cancel.clone(),
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(timeline.clone(), app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        interval_ms = app_config.timeline.interval_ms,
        capacity = app_config.timeline.capacity,
        "Listening on http://{}",
        addr
    );

    let served = tokio::select! {
        result = axum::serve(listener, app) => result,
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            Ok(())
        }
    };

    cancel.cancel();
    let _ = worker_handle.await;
    timeline.join().await;
    tracing::info!(
        snapshots_stored = timeline.count_stats(),
        "Timeline closed"
    );

    served?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
