// Docker container models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerStat {
    pub cpu: f32,
    pub mem_used: u64,
}

/// Container descriptor carried by lifecycle events and kept in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub image: String,
    // Wire key kept as published by earlier agent versions.
    #[serde(rename = "runing")]
    pub running: bool,
}

impl ContainerInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        running: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            running,
        }
    }
}
