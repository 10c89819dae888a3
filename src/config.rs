use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub timeline: TimelineConfig,
    pub monitoring: MonitoringConfig,
    pub publishing: PublishingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineConfig {
    /// Period between two frozen snapshots.
    pub interval_ms: u64,
    /// Number of snapshots kept; the oldest is overwritten once full.
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (stored snapshots, known containers) at INFO level.
    pub stats_log_interval_secs: u64,
    #[serde(default = "default_docker_enabled")]
    pub docker_enabled: bool,
}

fn default_docker_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Push period of the exported timeline on /ws/timeline.
    pub timeline_frequency_ms: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.timeline.interval_ms > 0,
            "timeline.interval_ms must be > 0, got {}",
            self.timeline.interval_ms
        );
        anyhow::ensure!(
            self.timeline.capacity > 0,
            "timeline.capacity must be > 0, got {}",
            self.timeline.capacity
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.publishing.timeline_frequency_ms > 0,
            "publishing.timeline_frequency_ms must be > 0, got {}",
            self.publishing.timeline_frequency_ms
        );
        Ok(())
    }
}
