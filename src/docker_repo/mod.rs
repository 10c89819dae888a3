// Docker container stats and lifecycle events via bollard

mod events;
mod stats;

use crate::models::{ContainerInfo, ContainerStat, PerfStat};
use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{instrument, warn};

pub struct DockerRepo {
    docker: Docker,
    live_stats: Arc<RwLock<HashMap<String, ContainerStat>>>,
    active_streams: Arc<RwLock<HashMap<String, tokio::task::JoinHandle<()>>>>,
    running: Mutex<HashMap<String, ContainerInfo>>,
}

impl DockerRepo {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self {
            docker,
            live_stats: Arc::new(RwLock::new(HashMap::new())),
            active_streams: Arc::new(RwLock::new(HashMap::new())),
            running: Mutex::new(HashMap::new()),
        })
    }

    /// Sparse container update: `c_stat` for every running container, and
    /// `c_event` only when the running set changed since the previous poll.
    #[instrument(skip(self), fields(repo = "docker", operation = "poll"))]
    pub async fn poll(&self) -> PerfStat {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);
        let filter = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = match self.docker.list_containers(Some(filter)).await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Docker list_containers failed");
                return PerfStat {
                    c_stat: Some(self.get_cached_stats().await),
                    ..Default::default()
                };
            }
        };

        let current: HashMap<String, ContainerInfo> = containers
            .iter()
            .filter_map(|c| {
                let id = c.id.clone()?;
                let name = c
                    .names
                    .as_ref()
                    .and_then(|n| n.first())
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_else(|| id.clone());
                let image = c.image.clone().unwrap_or_default();
                Some((id.clone(), ContainerInfo::new(id, name, image, true)))
            })
            .collect();

        let c_event = {
            let mut running = self.running.lock().await;
            let changes = events::diff_containers(&running, &current);
            *running = current.clone();
            changes
        };

        self.sync_streams(&current).await;

        PerfStat {
            c_stat: Some(self.get_cached_stats().await),
            c_event: (!c_event.is_empty()).then_some(c_event),
            ..Default::default()
        }
    }

    /// Starts a stats stream for each newly running container and aborts the
    /// streams of containers that are gone.
    async fn sync_streams(&self, running: &HashMap<String, ContainerInfo>) {
        let current_keys: Vec<String> = {
            let r = self.active_streams.read().await;
            r.keys().cloned().collect()
        };

        let to_add: Vec<&ContainerInfo> = running
            .values()
            .filter(|c| !current_keys.contains(&c.id))
            .collect();
        let to_remove: Vec<String> = current_keys
            .into_iter()
            .filter(|id| !running.contains_key(id))
            .collect();

        {
            let mut streams = self.active_streams.write().await;
            for info in to_add {
                let handle = self.start_monitoring(info.id.clone(), info.name.clone());
                streams.insert(info.id.clone(), handle);
            }
            for id in &to_remove {
                if let Some(handle) = streams.remove(id) {
                    handle.abort();
                }
            }
        }
        if !to_remove.is_empty() {
            let mut live = self.live_stats.write().await;
            for id in &to_remove {
                live.remove(id);
            }
        }
    }

    fn start_monitoring(&self, id: String, name: String) -> tokio::task::JoinHandle<()> {
        let docker = self.docker.clone();
        let live_stats = self.live_stats.clone();
        let active_streams = self.active_streams.clone();

        tokio::spawn(async move {
            let options = StatsOptions {
                stream: true,
                ..Default::default()
            };
            let mut stream = docker.stats(&id, Some(options));

            while let Some(result) = stream.next().await {
                match result {
                    Ok(s) => {
                        if let Some(stat) = stats::process_statistics(&s) {
                            live_stats.write().await.insert(id.clone(), stat);
                        }
                    }
                    Err(e) => {
                        warn!(container = %name, error = %e, "Stats stream error");
                        break;
                    }
                }
            }
            tracing::info!(container = %name, "Stats stream ended");
            active_streams.write().await.remove(&id);
            live_stats.write().await.remove(&id);
        })
    }

    async fn get_cached_stats(&self) -> BTreeMap<String, ContainerStat> {
        let live = self.live_stats.read().await;
        live.iter().map(|(id, s)| (id.clone(), *s)).collect()
    }
}
