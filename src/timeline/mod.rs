//! Rolling performance timeline.
//!
//! Producers push sparse [`PerfStat`] updates into a single "current" state;
//! a background scheduler freezes that state into a fixed-capacity ring on
//! every tick, and consumers export the captured window oldest to newest.
//! All mutable state sits behind one lock, so an export never observes a
//! half-applied update.

mod registry;
mod ring;
mod scheduler;

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::TimelineError;
use crate::models::{PerfStat, Timeline};
use registry::ContainerRegistry;
use ring::Ring;

/// Everything guarded by the manager lock.
#[derive(Debug)]
pub(crate) struct TimelineState {
    current: PerfStat,
    registry: ContainerRegistry,
    ring: Ring,
}

impl TimelineState {
    fn new(initial: PerfStat, capacity: usize) -> Result<Self, TimelineError> {
        let ring = Ring::new(capacity)?;
        let mut registry = ContainerRegistry::default();
        if let Some(events) = &initial.c_event {
            registry.upsert_all(events);
        }
        Ok(Self {
            current: initial,
            registry,
            ring,
        })
    }

    /// Whole-field replace for every present field; `c_event` entries are
    /// additionally upserted into the registry.
    fn apply(&mut self, partial: PerfStat) {
        let PerfStat {
            cpu,
            mem,
            net_io,
            disk_usage,
            c_stat,
            c_event,
        } = partial;

        if cpu.is_some() {
            self.current.cpu = cpu;
        }
        if mem.is_some() {
            self.current.mem = mem;
        }
        if net_io.is_some() {
            self.current.net_io = net_io;
        }
        if disk_usage.is_some() {
            self.current.disk_usage = disk_usage;
        }
        if c_stat.is_some() {
            self.current.c_stat = c_stat;
        }
        if let Some(events) = c_event {
            self.registry.upsert_all(&events);
            self.current.c_event = Some(events);
        }
    }

    /// Freezes a copy of the current state into the ring. Returns the used count.
    fn capture(&mut self) -> usize {
        let frozen = self.current.clone();
        self.ring.push(frozen);
        self.ring.len()
    }

    fn export(&self, interval: u64) -> Timeline {
        Timeline {
            interval,
            stats: self.ring.history(),
            c_info: self.registry.snapshot(),
        }
    }
}

// Every writer stores a slot before moving the cursor, so the state behind a
// poisoned lock is still consistent and safe to keep using.
fn read_state(state: &RwLock<TimelineState>) -> RwLockReadGuard<'_, TimelineState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_state(state: &RwLock<TimelineState>) -> RwLockWriteGuard<'_, TimelineState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

struct Inner {
    state: Arc<RwLock<TimelineState>>,
    cancel: CancellationToken,
    interval_ms: u64,
    scheduler: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

/// Handle to a running timeline. Clones share the same state and scheduler.
#[derive(Clone)]
pub struct TimelineManager {
    inner: Arc<Inner>,
}

impl TimelineManager {
    /// Creates the manager and starts its snapshot scheduler on the current
    /// tokio runtime. The manager stays active until `cancel` fires.
    pub fn create(
        cancel: CancellationToken,
        interval_ms: u64,
        capacity: usize,
        initial: PerfStat,
    ) -> Result<Self, TimelineError> {
        if interval_ms == 0 {
            return Err(TimelineError::InvalidInterval(interval_ms));
        }
        let state = Arc::new(RwLock::new(TimelineState::new(initial, capacity)?));
        tokio::runtime::Handle::try_current().map_err(|_| TimelineError::NoRuntime)?;

        let handle = scheduler::spawn(
            state.clone(),
            cancel.clone(),
            Duration::from_millis(interval_ms),
        );
        tracing::debug!(interval_ms, capacity, "Timeline manager created");

        Ok(Self {
            inner: Arc::new(Inner {
                state,
                cancel,
                interval_ms,
                scheduler: Mutex::new(Some(handle)),
            }),
        })
    }

    /// True until the cancellation token fires.
    pub fn active(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    /// Number of snapshots currently held.
    pub fn count_stats(&self) -> usize {
        read_state(&self.inner.state).ring.len()
    }

    /// Drops the captured history. The container registry is kept.
    pub fn clear(&self) {
        write_state(&self.inner.state).ring.clear();
    }

    /// Merges a sparse update into the current state.
    pub fn update(&self, partial: PerfStat) -> Result<(), TimelineError> {
        if !self.active() {
            return Err(TimelineError::Closed);
        }
        let mut state = write_state(&self.inner.state);
        // Cancellation may have fired while waiting on the lock.
        if !self.active() {
            return Err(TimelineError::Closed);
        }
        state.apply(partial);
        Ok(())
    }

    /// Copies out the captured history, oldest first, with the full registry.
    pub fn export(&self) -> Timeline {
        read_state(&self.inner.state).export(self.inner.interval_ms)
    }

    pub fn interval_ms(&self) -> u64 {
        self.inner.interval_ms
    }

    pub fn capacity(&self) -> usize {
        read_state(&self.inner.state).ring.capacity()
    }

    /// Number of distinct containers seen since creation.
    pub fn container_count(&self) -> usize {
        read_state(&self.inner.state).registry.len()
    }

    /// Waits for the scheduler to finish. Only returns once the cancellation
    /// token has fired; later calls return immediately.
    pub async fn join(&self) {
        let handle = self
            .inner
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::error!(error = %e, "timeline scheduler terminated abnormally");
        }
    }
}

impl std::fmt::Debug for TimelineManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineManager")
            .field("interval_ms", &self.inner.interval_ms)
            .field("capacity", &self.capacity())
            .field("active", &self.active())
            .finish()
    }
}
