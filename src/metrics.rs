//! Prometheus text exposition of the captured timeline.
//!
//! Gauges reflect the newest snapshot that carries each field. The CPU
//! histogram observes every snapshot in the window, so it describes usage
//! over the last `capacity * interval`. A fresh registry is built per scrape,
//! which keeps vanished containers from lingering as stale series.

use prometheus::{
    Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

use crate::error::MetricsError;
use crate::models::{PerfStat, Timeline};

const CPU_BUCKETS: &[f64] = &[5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 100.0];

pub struct PerfMetrics {
    pub cpu_usage_per_core: GaugeVec,
    pub cpu_usage_percent: Histogram,
    pub memory_total_bytes: Gauge,
    pub memory_used_bytes: Gauge,
    pub memory_available_bytes: Gauge,
    pub container_cpu_usage_percent: GaugeVec,
    pub container_memory_used_bytes: GaugeVec,
    pub timeline_snapshots: Gauge,
}

impl PerfMetrics {
    /// Creates and registers all metrics with the registry.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let cpu_usage_per_core = GaugeVec::new(
            Opts::new("cpu_usage_per_core", "CPU usage percentage per core"),
            &["core"],
        )?;
        let cpu_usage_percent = Histogram::with_opts(
            HistogramOpts::new(
                "cpu_usage_percent",
                "Overall CPU usage percentage across the captured window",
            )
            .buckets(CPU_BUCKETS.to_vec()),
        )?;
        let memory_total_bytes = Gauge::new("memory_total_bytes", "Total memory in bytes")?;
        let memory_used_bytes = Gauge::new("memory_used_bytes", "Used memory in bytes")?;
        let memory_available_bytes =
            Gauge::new("memory_available_bytes", "Available memory in bytes")?;
        let container_cpu_usage_percent = GaugeVec::new(
            Opts::new(
                "container_cpu_usage_percent",
                "CPU usage percentage per container",
            ),
            &["id"],
        )?;
        let container_memory_used_bytes = GaugeVec::new(
            Opts::new(
                "container_memory_used_bytes",
                "Memory used per container in bytes",
            ),
            &["id"],
        )?;
        let timeline_snapshots = Gauge::new(
            "timeline_snapshots",
            "Number of snapshots currently held by the timeline",
        )?;

        registry.register(Box::new(cpu_usage_per_core.clone()))?;
        registry.register(Box::new(cpu_usage_percent.clone()))?;
        registry.register(Box::new(memory_total_bytes.clone()))?;
        registry.register(Box::new(memory_used_bytes.clone()))?;
        registry.register(Box::new(memory_available_bytes.clone()))?;
        registry.register(Box::new(container_cpu_usage_percent.clone()))?;
        registry.register(Box::new(container_memory_used_bytes.clone()))?;
        registry.register(Box::new(timeline_snapshots.clone()))?;

        Ok(Self {
            cpu_usage_per_core,
            cpu_usage_percent,
            memory_total_bytes,
            memory_used_bytes,
            memory_available_bytes,
            container_cpu_usage_percent,
            container_memory_used_bytes,
            timeline_snapshots,
        })
    }

    pub fn observe(&self, timeline: &Timeline) {
        self.timeline_snapshots.set(timeline.stats.len() as f64);

        for stat in &timeline.stats {
            if let Some(cpu) = &stat.cpu {
                self.cpu_usage_percent.observe(f64::from(cpu.total));
            }
        }

        if let Some(cpu) = newest(timeline, |s| s.cpu.as_ref()) {
            for (i, usage) in cpu.core.iter().enumerate() {
                self.cpu_usage_per_core
                    .with_label_values(&[i.to_string().as_str()])
                    .set(f64::from(*usage));
            }
        }

        if let Some(mem) = newest(timeline, |s| s.mem.as_ref()) {
            self.memory_total_bytes.set(mem.total as f64);
            self.memory_used_bytes.set(mem.used as f64);
            self.memory_available_bytes.set(mem.available as f64);
        }

        if let Some(containers) = newest(timeline, |s| s.c_stat.as_ref()) {
            for (id, stat) in containers {
                self.container_cpu_usage_percent
                    .with_label_values(&[id.as_str()])
                    .set(f64::from(stat.cpu));
                self.container_memory_used_bytes
                    .with_label_values(&[id.as_str()])
                    .set(stat.mem_used as f64);
            }
        }
    }
}

fn newest<'a, T>(
    timeline: &'a Timeline,
    field: impl Fn(&'a PerfStat) -> Option<&'a T>,
) -> Option<&'a T> {
    timeline.stats.iter().rev().find_map(field)
}

/// Renders the timeline in Prometheus text format.
pub fn render(timeline: &Timeline) -> Result<String, MetricsError> {
    let registry = Registry::new();
    let metrics = PerfMetrics::new(&registry)?;
    metrics.observe(timeline);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
