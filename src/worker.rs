// Background collection worker: samples host and container stats on a fixed
// cadence and feeds them into the timeline as sparse updates.

use crate::docker_repo::DockerRepo;
use crate::models::PerfStat;
use crate::sysinfo_repo::SysinfoRepo;
use crate::timeline::TimelineManager;
use std::sync::Arc;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Pollers, the timeline they feed, and the shutdown signal.
pub struct WorkerDeps {
    pub sysinfo_repo: Arc<SysinfoRepo>,
    /// None when Docker collection is disabled or unavailable.
    pub docker_repo: Option<Arc<DockerRepo>>,
    pub timeline: TimelineManager,
    pub cancel: CancellationToken,
}

pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        sysinfo_repo,
        docker_repo,
        timeline,
        cancel,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::debug_span!("worker", sample_interval_ms);
    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = tick.tick() => {
                        match sysinfo_repo.sample().await {
                            Ok(stat) => {
                                if !push(&timeline, stat, "host") {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "sample_host",
                                    "host stats failed"
                                );
                            }
                        }
                        if let Some(docker_repo) = &docker_repo {
                            let stat = docker_repo.poll().await;
                            if !push(&timeline, stat, "docker") {
                                break;
                            }
                        }
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            snapshots_stored = timeline.count_stats(),
                            capacity = timeline.capacity(),
                            known_containers = timeline.container_count(),
                            active = timeline.active(),
                            "app stats"
                        );
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}

/// Applies one sparse update. Returns false once the timeline no longer accepts updates.
fn push(timeline: &TimelineManager, stat: PerfStat, source: &'static str) -> bool {
    if stat.is_empty() {
        return true;
    }
    match timeline.update(stat) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, source, "Timeline closed; stopping collection");
            false
        }
    }
}
