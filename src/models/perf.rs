// Sparse snapshot and exported timeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ContainerInfo, ContainerStat, CpuStat, DiskUsage, MemStat, NetStat};

/// A performance snapshot where every field is optional.
///
/// As an update, a `None` field means "unchanged" and a `Some` field (even an
/// empty map or list) replaces the current value wholesale. As a frozen
/// timeline entry, it is the full state at the time of the tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerfStat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<MemStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_io: Option<BTreeMap<String, NetStat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<BTreeMap<String, DiskUsage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_stat: Option<BTreeMap<String, ContainerStat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_event: Option<Vec<ContainerInfo>>,
}

impl PerfStat {
    /// True when no field is present, i.e. the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none()
            && self.mem.is_none()
            && self.net_io.is_none()
            && self.disk_usage.is_none()
            && self.c_stat.is_none()
            && self.c_event.is_none()
    }
}

/// Exported history: frozen snapshots oldest to newest plus the container registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Sampling interval in milliseconds.
    pub interval: u64,
    pub stats: Vec<PerfStat>,
    /// Every container seen so far, keyed by ID.
    #[serde(rename = "c_event")]
    pub c_info: BTreeMap<String, ContainerInfo>,
}
