//! Error types for the performance timeline.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineError {
    #[error("perf timeline manager is closed")]
    Closed,

    #[error("timeline capacity must be >= 1, got {0}")]
    InvalidCapacity(usize),

    #[error("timeline interval must be >= 1 ms, got {0}")]
    InvalidInterval(u64),

    #[error("timeline manager must be created inside a tokio runtime")]
    NoRuntime,
}

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("failed to build metrics: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("metrics output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
