// Host-level stats: CPU, memory, network interfaces, volumes

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuStat {
    /// Global usage in percent (0-100).
    pub total: f32,
    /// Per-core usage in percent, in core order.
    pub core: Vec<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStat {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

/// Traffic on one interface since the previous sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetStat {
    pub bytes_send: u64,
    pub bytes_recv: u64,
    pub packets_send: u64,
    pub packets_recv: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
}
