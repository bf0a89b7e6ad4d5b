//! Contiguous slot packing.
//!
//! Given a task's estimated duration and a sorted free-slot sequence, the
//! packer finds the earliest run of pairwise-adjacent slots long enough to
//! hold the task. The scan is a single O(n) pass tracking run length;
//! identical slots are deduplicated first so sorted order is a strict
//! total order and the earliest qualifying run is unambiguous.

use crate::availability::Slot;
use crate::interval::Interval;

/// Packs task durations into runs of adjacent slots.
#[derive(Debug, Clone, Copy)]
pub struct SlotPacker {
    granularity_min: i64,
}

impl SlotPacker {
    pub fn new(granularity_min: i64) -> Self {
        Self {
            granularity_min: granularity_min.max(1),
        }
    }

    /// Number of slots needed to hold `estimated_minutes`.
    ///
    /// Rounds up; a zero-minute estimate still occupies one slot.
    pub fn required_slots(&self, estimated_minutes: u32) -> usize {
        let g = self.granularity_min as u32;
        (estimated_minutes.div_ceil(g).max(1)) as usize
    }

    /// Find the earliest run of adjacent slots that fits the task.
    ///
    /// Returns the interval spanning the run, or `None` when no run in
    /// the given pool is long enough. The pool is not consumed; the
    /// caller removes the covered slots on success.
    pub fn pack(&self, estimated_minutes: u32, slots: &[Slot]) -> Option<Interval> {
        let required = self.required_slots(estimated_minutes);
        let pool = dedup_sorted(slots);
        if pool.len() < required {
            return None;
        }

        let mut run_start = 0usize;
        for i in 0..pool.len() {
            if i > 0 && !pool[i - 1].interval().adjacent_to(&pool[i].interval()) {
                run_start = i;
            }
            if i + 1 - run_start >= required {
                let first = pool[i + 1 - required];
                return Some(Interval::new(first.start(), pool[i].end()));
            }
        }
        None
    }

    /// Dry-run placement count: how many distinct start positions could
    /// hold the task in the current pool.
    ///
    /// Used as the scarcity input for priority scoring; never consumes
    /// slots, so placement order cannot feed back into priorities.
    pub fn fit_count(&self, estimated_minutes: u32, slots: &[Slot]) -> usize {
        let required = self.required_slots(estimated_minutes);
        let pool = dedup_sorted(slots);

        let mut count = 0usize;
        let mut run_len = 0usize;
        for i in 0..pool.len() {
            if i > 0 && !pool[i - 1].interval().adjacent_to(&pool[i].interval()) {
                run_len = 0;
            }
            run_len += 1;
            if run_len >= required {
                count += 1;
            }
        }
        count
    }
}

/// Sort and drop exact-duplicate slots so the scan sees a strict total
/// order.
fn dedup_sorted(slots: &[Slot]) -> Vec<Slot> {
    let mut pool = slots.to_vec();
    pool.sort();
    pool.dedup();
    pool
}
