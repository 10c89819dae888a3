// Turn a raw Docker stats response into a ContainerStat.

use crate::models::ContainerStat;
use bollard::models::ContainerStatsResponse;

/// Returns None until Docker has both a current and a previous CPU reading.
pub(crate) fn process_statistics(s: &ContainerStatsResponse) -> Option<ContainerStat> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let precpu_stats = s.precpu_stats.as_ref()?;

    let cpu_usage = cpu_stats.cpu_usage.as_ref()?;
    let precpu_usage = precpu_stats.cpu_usage.as_ref()?;

    let cpu_delta =
        cpu_usage.total_usage.unwrap_or(0) as i64 - precpu_usage.total_usage.unwrap_or(0) as i64;
    let system_delta = cpu_stats.system_cpu_usage.unwrap_or(0) as i64
        - precpu_stats.system_cpu_usage.unwrap_or(0) as i64;
    let online = cpu_stats.online_cpus.unwrap_or(1) as f64;
    let cpu = if system_delta > 0 && online > 0.0 {
        (cpu_delta as f64 / system_delta as f64) * online * 100.0
    } else {
        0.0
    };

    let mem_used = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);

    Some(ContainerStat {
        cpu: cpu.max(0.0) as f32,
        mem_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{ContainerCpuStats, ContainerCpuUsage, ContainerMemoryStats};

    fn minimal_cpu_stats(total_usage: u64, system_cpu_usage: u64) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus: Some(2),
            throttling_data: None,
        }
    }

    #[test]
    fn returns_none_when_cpu_stats_missing() {
        let s = ContainerStatsResponse {
            cpu_stats: None,
            precpu_stats: Some(minimal_cpu_stats(0, 0)),
            ..Default::default()
        };
        assert!(process_statistics(&s).is_none());
    }

    #[test]
    fn returns_none_when_precpu_stats_missing() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100, 1000)),
            precpu_stats: None,
            ..Default::default()
        };
        assert!(process_statistics(&s).is_none());
    }

    #[test]
    fn computes_cpu_percent_and_memory() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100_000_000, 1_000_000_000)),
            precpu_stats: Some(minimal_cpu_stats(50_000_000, 500_000_000)),
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(256 * 1024 * 1024),
                limit: Some(512 * 1024 * 1024),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = process_statistics(&s).unwrap();
        assert!((out.cpu - 20.0).abs() < 0.01);
        assert_eq!(out.mem_used, 256 * 1024 * 1024);
    }

    #[test]
    fn zero_system_delta_gives_zero_cpu() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100, 500)),
            precpu_stats: Some(minimal_cpu_stats(50, 500)),
            ..Default::default()
        };
        assert_eq!(process_statistics(&s).unwrap().cpu, 0.0);
    }

    #[test]
    fn counter_reset_never_reports_negative_cpu() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(10, 2000)),
            precpu_stats: Some(minimal_cpu_stats(500, 1000)),
            ..Default::default()
        };
        assert_eq!(process_statistics(&s).unwrap().cpu, 0.0);
    }
}
