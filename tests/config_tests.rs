// Config loading and validation tests

use perfwatch::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[timeline]
interval_ms = 1000
capacity = 300

[monitoring]
sample_interval_ms = 1000
stats_log_interval_secs = 60

[publishing]
timeline_frequency_ms = 5000
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.timeline.interval_ms, 1000);
    assert_eq!(config.timeline.capacity, 300);
    assert_eq!(config.monitoring.sample_interval_ms, 1000);
    assert_eq!(config.publishing.timeline_frequency_ms, 5000);
}

#[test]
fn test_config_docker_enabled_by_default() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("valid");
    assert!(config.monitoring.docker_enabled);

    let disabled = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 60\ndocker_enabled = false",
    );
    let config = AppConfig::load_from_str(&disabled).expect("valid");
    assert!(!config.monitoring.docker_enabled);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_host() {
    let bad = VALID_CONFIG.replace("host = \"0.0.0.0\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.host"));
}

#[test]
fn test_config_validation_rejects_zero_capacity() {
    let bad = VALID_CONFIG.replace("capacity = 300", "capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("timeline.capacity"));
}

#[test]
fn test_config_validation_rejects_zero_timeline_interval() {
    let bad = VALID_CONFIG.replace("interval_ms = 1000\ncapacity", "interval_ms = 0\ncapacity");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("timeline.interval_ms"));
}

#[test]
fn test_config_validation_rejects_sample_interval_zero() {
    let bad = VALID_CONFIG.replace("sample_interval_ms = 1000", "sample_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sample_interval_ms"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_timeline_frequency_zero() {
    let bad = VALID_CONFIG.replace("timeline_frequency_ms = 5000", "timeline_frequency_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("timeline_frequency_ms"));
}

#[test]
fn test_config_rejects_missing_section() {
    let bad = VALID_CONFIG.replace("[timeline]\ninterval_ms = 1000\ncapacity = 300\n", "");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.timeline.capacity, 300);
}
