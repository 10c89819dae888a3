// Background snapshot task: freezes the current state into the ring on every tick.

use std::sync::{Arc, RwLock};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::{TimelineState, write_state};

/// Spawns the scheduler. The first tick fires one `period` after this call;
/// the task exits as soon as `cancel` fires and never writes a slot afterwards.
pub(super) fn spawn(
    state: Arc<RwLock<TimelineState>>,
    cancel: CancellationToken,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    let start = Instant::now() + period;
    let span = tracing::debug_span!(
        "timeline_scheduler",
        interval_ms = period.as_millis() as u64
    );
    tokio::spawn(
        async move {
            let mut tick = interval_at(start, period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("Timeline scheduler started");

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = tick.tick() => {
                        let used = write_state(&state).capture();
                        tracing::trace!(used, "snapshot captured");
                    }
                }
            }
            tracing::debug!("Timeline scheduler stopped");
        }
        .instrument(span),
    )
}
