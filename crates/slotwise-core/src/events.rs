use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every observable state change in the engine produces an Event.
/// The UI layer polls for events; collaborators subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        phase: Phase,
        task_id: Option<String>,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        phase: Phase,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    /// A work or break interval ran down to zero. The machine lands in
    /// the paused state of the next phase; the user starts it explicitly.
    PhaseCompleted {
        completed_phase: Phase,
        next_phase: Phase,
        completed_work_intervals: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// A rescheduling pass finished. `seq` echoes the caller's request
    /// sequence number so stale responses can be discarded.
    ScheduleComputed {
        seq: u64,
        placed: usize,
        unplaced: usize,
        at: DateTime<Utc>,
    },
}
