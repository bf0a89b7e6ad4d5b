//! Free-slot discovery over a date range.
//!
//! The availability finder walks a range day by day, intersects each day's
//! working-hours window with the range, subtracts busy calendar intervals,
//! and splits what remains into fixed-size slots aligned to the window
//! start. Output is strictly chronological with no duplicates; free
//! remainders shorter than one granularity yield no slot.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::interval::{self, Interval};

/// A single working-hours window within one day (wall-clock times).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Per-weekday working hours. Days with no window are fully unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkingHoursPolicy {
    /// Indexed Monday = 0 .. Sunday = 6.
    windows: [Option<DayWindow>; 7],
}

impl WorkingHoursPolicy {
    /// An empty policy: every day unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same window Monday through Friday.
    pub fn weekdays(start: NaiveTime, end: NaiveTime) -> Self {
        let mut policy = Self::new();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            policy = policy.with_day(day, start, end);
        }
        policy
    }

    pub fn with_day(mut self, day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        self.windows[day.num_days_from_monday() as usize] = Some(DayWindow { start, end });
        self
    }

    pub fn window(&self, day: Weekday) -> Option<DayWindow> {
        self.windows[day.num_days_from_monday() as usize]
    }

    /// Every configured window must have `start < end`.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (idx, window) in self.windows.iter().enumerate() {
            if let Some(w) = window {
                if w.start >= w.end {
                    return Err(ScheduleError::InvalidPolicy {
                        day: weekday_from_index(idx),
                        start: w.start,
                        end: w.end,
                    });
                }
            }
        }
        Ok(())
    }
}

fn weekday_from_index(idx: usize) -> Weekday {
    match idx {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// A free interval of exactly one granularity.
///
/// Slots are immutable; the scheduler consumes one by removing it from
/// the pool, never by mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot(pub Interval);

impl Slot {
    pub fn start(&self) -> DateTime<Utc> {
        self.0.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.0.end
    }

    pub fn interval(&self) -> Interval {
        self.0
    }
}

/// Finds free slots of a fixed granularity within a date range.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityFinder {
    granularity_min: i64,
}

impl AvailabilityFinder {
    /// Granularity below one minute is clamped up to one.
    pub fn new(granularity_min: i64) -> Self {
        Self {
            granularity_min: granularity_min.max(1),
        }
    }

    pub fn granularity_min(&self) -> i64 {
        self.granularity_min
    }

    /// Compute the ordered free-slot sequence for `[range_start, range_end)`.
    ///
    /// Fails with `ScheduleError::InvalidRange` on an empty or inverted
    /// range, and `ScheduleError::InvalidPolicy` on a malformed window.
    /// Pure: identical inputs always yield identical output.
    pub fn find_slots(
        &self,
        policy: &WorkingHoursPolicy,
        busy: &[Interval],
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Slot>, ScheduleError> {
        if range_start >= range_end {
            return Err(ScheduleError::InvalidRange {
                start: range_start,
                end: range_end,
            });
        }
        policy.validate()?;

        let mut slots = Vec::new();
        let mut day = range_start.date_naive();
        let last_day = range_end.date_naive();

        while day <= last_day {
            if let Some(window) = policy.window(day.weekday()) {
                let window_start = day.and_time(window.start).and_utc();
                let window_end = day.and_time(window.end).and_utc();

                // Intersect the day's window with the requested range.
                let clipped_start = window_start.max(range_start);
                let clipped_end = window_end.min(range_end);

                if clipped_start < clipped_end {
                    let free = interval::subtract(
                        Interval::new(clipped_start, clipped_end),
                        busy,
                    );
                    for range in free {
                        self.split_into_slots(range, window_start, &mut slots);
                    }
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        Ok(slots)
    }

    /// Split one free range into granularity-aligned slots, anchored to
    /// the day's window start. Partial leading/trailing fragments are
    /// dropped.
    fn split_into_slots(&self, free: Interval, anchor: DateTime<Utc>, out: &mut Vec<Slot>) {
        let g = self.granularity_min;
        let offset = (free.start - anchor).num_minutes();
        let aligned = offset.div_euclid(g) * g + if offset.rem_euclid(g) == 0 { 0 } else { g };

        let mut cursor = anchor + Duration::minutes(aligned);
        while cursor + Duration::minutes(g) <= free.end {
            out.push(Slot(Interval::new(cursor, cursor + Duration::minutes(g))));
            cursor += Duration::minutes(g);
        }
    }
}
