// Host stats via sysinfo: CPU, memory, per-interface traffic, per-volume usage

use crate::models::{CpuStat, DiskUsage, MemStat, NetStat, PerfStat};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use sysinfo::{Disks, Networks, System};
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Arc<Mutex<System>>,
    disks: Arc<Mutex<Disks>>,
    networks: Arc<Mutex<Networks>>,
    last_cpu_refresh: Arc<Mutex<Option<(Instant, CpuStat)>>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
            networks: Arc::new(Mutex::new(Networks::new_with_refreshed_list())),
            last_cpu_refresh: Arc::new(Mutex::new(None)),
        }
    }

    /// Global and per-core usage. Calls closer together than sysinfo's minimum
    /// refresh interval return the previous reading instead of blocking.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_cpu_stat"))]
    pub async fn get_cpu_stat(&self) -> anyhow::Result<CpuStat> {
        let sys = self.sys.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            let mut last = last_cpu_refresh
                .lock()
                .map_err(|e| anyhow::anyhow!("cpu cache lock poisoned: {}", e))?;

            let now = Instant::now();
            if let Some((prev_ts, prev)) = last.as_ref()
                && now.duration_since(*prev_ts) < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL
            {
                return Ok(prev.clone());
            }

            sys.refresh_cpu_usage();
            let stat = CpuStat {
                total: sys.global_cpu_usage().clamp(0.0, 100.0),
                core: sys
                    .cpus()
                    .iter()
                    .map(|c| c.cpu_usage().clamp(0.0, 100.0))
                    .collect(),
            };
            *last = Some((now, stat.clone()));
            Ok(stat)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_mem_stat"))]
    pub async fn get_mem_stat(&self) -> anyhow::Result<MemStat> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let available = sys.available_memory();
            Ok(MemStat {
                total,
                used: total.saturating_sub(available),
                available,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Traffic per interface since the previous call.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_net_io"))]
    pub async fn get_net_io(&self) -> anyhow::Result<BTreeMap<String, NetStat>> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks.refresh(true);
            Ok(networks
                .list()
                .iter()
                .map(|(name, data)| {
                    (
                        name.clone(),
                        NetStat {
                            bytes_send: data.transmitted(),
                            bytes_recv: data.received(),
                            packets_send: data.packets_transmitted(),
                            packets_recv: data.packets_received(),
                        },
                    )
                })
                .collect())
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Usage per mounted volume, keyed by mount point.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_disk_usage"))]
    pub async fn get_disk_usage(&self) -> anyhow::Result<BTreeMap<String, DiskUsage>> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks.refresh(false);
            Ok(disks
                .list()
                .iter()
                .map(|d| {
                    let total = d.total_space();
                    (
                        d.mount_point().to_string_lossy().into_owned(),
                        DiskUsage {
                            total,
                            used: total.saturating_sub(d.available_space()),
                        },
                    )
                })
                .collect())
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// One full host reading, every host field present.
    pub async fn sample(&self) -> anyhow::Result<PerfStat> {
        Ok(PerfStat {
            cpu: Some(self.get_cpu_stat().await?),
            mem: Some(self.get_mem_stat().await?),
            net_io: Some(self.get_net_io().await?),
            disk_usage: Some(self.get_disk_usage().await?),
            ..Default::default()
        })
    }
}
