//! Focus-timer state machine.
//!
//! The Pomodoro session is a wall-clock-based state machine with no
//! internal threads: the caller drives it with one `tick()` per second
//! (or calls `resync()` after the host was suspended). It is ephemeral
//! process-local state with a single writer; one active session per user.

mod session;

pub use session::{Phase, PomodoroSession, SessionRecord, SessionState};

use serde::{Deserialize, Serialize};

/// Work/break durations for one session cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_work_min")]
    pub work_min: u32,
    #[serde(default = "default_break_min")]
    pub break_min: u32,
}

fn default_work_min() -> u32 {
    25
}

fn default_break_min() -> u32 {
    5
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            break_min: default_break_min(),
        }
    }
}

impl PomodoroConfig {
    /// Full duration of a phase in seconds.
    pub fn phase_seconds(&self, phase: Phase) -> u32 {
        let minutes = match phase {
            Phase::Work => self.work_min,
            Phase::Break => self.break_min,
        };
        minutes.saturating_mul(60)
    }
}
