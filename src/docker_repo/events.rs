// Container lifecycle events from two consecutive listings of running containers.

use crate::models::ContainerInfo;
use std::collections::HashMap;

/// Descriptors for containers that appeared (or changed name/image) since
/// `previous`, followed by those that disappeared, marked not running.
/// Sorted by ID within each group.
pub(crate) fn diff_containers(
    previous: &HashMap<String, ContainerInfo>,
    current: &HashMap<String, ContainerInfo>,
) -> Vec<ContainerInfo> {
    let mut started: Vec<ContainerInfo> = current
        .values()
        .filter(|c| previous.get(&c.id) != Some(*c))
        .cloned()
        .collect();
    started.sort_by(|a, b| a.id.cmp(&b.id));

    let mut stopped: Vec<ContainerInfo> = previous
        .values()
        .filter(|c| !current.contains_key(&c.id))
        .map(|c| ContainerInfo {
            running: false,
            ..c.clone()
        })
        .collect();
    stopped.sort_by(|a, b| a.id.cmp(&b.id));

    started.extend(stopped);
    started
}
