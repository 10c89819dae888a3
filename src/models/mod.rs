// Domain models: sparse performance snapshots and the exported timeline

mod container;
mod perf;
mod system;

pub use container::{ContainerInfo, ContainerStat};
pub use perf::{PerfStat, Timeline};
pub use system::{CpuStat, DiskUsage, MemStat, NetStat};
