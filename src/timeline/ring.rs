//! Fixed-capacity circular store of frozen snapshots.
//!
//! Slots are allocated once at construction. `clear` only rewinds the cursor;
//! stale slots are overwritten lazily by later pushes.

use crate::error::TimelineError;
use crate::models::PerfStat;

#[derive(Debug)]
pub(crate) struct Ring {
    slots: Vec<PerfStat>,
    rotate: usize,
    used: usize,
}

impl Ring {
    pub(crate) fn new(capacity: usize) -> Result<Self, TimelineError> {
        if capacity == 0 {
            return Err(TimelineError::InvalidCapacity(capacity));
        }
        Ok(Self {
            slots: vec![PerfStat::default(); capacity],
            rotate: 0,
            used: 0,
        })
    }

    /// Stores `stat` in the slot under the cursor, then advances the cursor.
    /// Once full, the oldest entry is the one overwritten.
    pub(crate) fn push(&mut self, stat: PerfStat) {
        self.slots[self.rotate] = stat;
        self.rotate = (self.rotate + 1) % self.slots.len();
        if self.used < self.slots.len() {
            self.used += 1;
        }
    }

    /// Returns clones of the valid entries, oldest to newest.
    pub(crate) fn history(&self) -> Vec<PerfStat> {
        let capacity = self.slots.len();
        let start = (self.rotate + capacity - self.used) % capacity;
        (0..self.used)
            .map(|i| self.slots[(start + i) % capacity].clone())
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.used = 0;
        self.rotate = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.used
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}
