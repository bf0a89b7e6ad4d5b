//! Interval arithmetic over half-open time ranges.
//!
//! All scheduling math is built on `[start, end)` intervals: overlap and
//! containment tests, adjacency at slot granularity, and merge/subtract of
//! interval sets. Everything here is pure and stateless; callers validate
//! their inputs (`start < end`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time range `[start, end)`.
///
/// Invariant: `start < end`. Touching endpoints do not overlap, which is
/// what makes back-to-back slots packable without double-booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open overlap test; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when `other` begins exactly where `self` ends.
    ///
    /// Only meaningful when both intervals sit on the same granularity
    /// grid; the availability finder guarantees that for slots.
    pub fn adjacent_to(&self, other: &Interval) -> bool {
        self.end == other.start
    }

    /// True when both endpoints fall on a `granularity_min` boundary
    /// measured from `anchor`.
    pub fn is_aligned(&self, anchor: DateTime<Utc>, granularity_min: i64) -> bool {
        if granularity_min <= 0 {
            return false;
        }
        let start_off = (self.start - anchor).num_minutes();
        let end_off = (self.end - anchor).num_minutes();
        start_off % granularity_min == 0 && end_off % granularity_min == 0
    }
}

/// Coalesce a set of intervals into a disjoint, ascending set.
///
/// Overlapping and touching intervals are merged. Input order does not
/// matter; empty or inverted entries are dropped.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals
        .iter()
        .copied()
        .filter(|iv| iv.start < iv.end)
        .collect();
    sorted.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => {
                if iv.end > last.end {
                    last.end = iv.end;
                }
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Subtract every busy interval from `free_range`.
///
/// Busy intervals are merged first, clipped to `free_range`, and anything
/// entirely outside the range is ignored. The result is the ascending set
/// of free sub-intervals; it is empty when the busy set covers the range.
pub fn subtract(free_range: Interval, busy: &[Interval]) -> Vec<Interval> {
    let merged = merge(busy);
    let mut free = Vec::new();
    let mut cursor = free_range.start;

    for b in &merged {
        if b.end <= cursor {
            continue;
        }
        if b.start >= free_range.end {
            break;
        }
        if b.start > cursor {
            free.push(Interval::new(cursor, b.start.min(free_range.end)));
        }
        cursor = cursor.max(b.end);
        if cursor >= free_range.end {
            return free;
        }
    }

    if cursor < free_range.end {
        free.push(Interval::new(cursor, free_range.end));
    }
    free
}
