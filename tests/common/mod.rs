// Shared test helpers
#![allow(dead_code)]

use perfwatch::models::*;
use std::collections::BTreeMap;

pub fn cpu_stat(total: f32) -> CpuStat {
    CpuStat {
        total,
        core: vec![total, total],
    }
}

pub fn mem_stat(used: u64) -> MemStat {
    MemStat {
        total: 16 * 1024,
        used,
        available: (16 * 1024u64).saturating_sub(used),
    }
}

pub fn container(id: &str, name: &str) -> ContainerInfo {
    ContainerInfo::new(id, name, format!("{}:latest", name), true)
}

/// A snapshot with every field present.
pub fn full_stat() -> PerfStat {
    let mut net_io = BTreeMap::new();
    net_io.insert(
        "eth0".to_string(),
        NetStat {
            bytes_send: 100,
            bytes_recv: 200,
            packets_send: 1,
            packets_recv: 2,
        },
    );
    let mut disk_usage = BTreeMap::new();
    disk_usage.insert(
        "/".to_string(),
        DiskUsage {
            total: 1000,
            used: 400,
        },
    );
    let mut c_stat = BTreeMap::new();
    c_stat.insert(
        "c1".to_string(),
        ContainerStat {
            cpu: 1.5,
            mem_used: 64,
        },
    );
    PerfStat {
        cpu: Some(cpu_stat(12.5)),
        mem: Some(mem_stat(4096)),
        net_io: Some(net_io),
        disk_usage: Some(disk_usage),
        c_stat: Some(c_stat),
        c_event: Some(vec![container("c1", "web")]),
    }
}
