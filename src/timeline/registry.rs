// Container registry: last known descriptor per container ID, never pruned

use crate::models::ContainerInfo;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub(crate) struct ContainerRegistry {
    entries: BTreeMap<String, ContainerInfo>,
}

impl ContainerRegistry {
    /// Inserts or overwrites each descriptor by ID. IDs not in `infos` are untouched.
    pub(crate) fn upsert_all(&mut self, infos: &[ContainerInfo]) {
        for info in infos {
            self.entries.insert(info.id.clone(), info.clone());
        }
    }

    pub(crate) fn snapshot(&self) -> BTreeMap<String, ContainerInfo> {
        self.entries.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
