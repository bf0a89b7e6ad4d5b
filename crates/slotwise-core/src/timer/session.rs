//! Pomodoro session state machine.
//!
//! Observable states form the cycle
//!
//! ```text
//! Idle -> WorkRunning -> WorkPaused -> BreakRunning -> BreakPaused -> ...
//! ```
//!
//! modeled as a `(SessionState, Phase)` pair. A completed interval lands
//! in the *paused* state of the next phase: the user starts the next
//! interval explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PomodoroConfig;
use crate::collaborators::SessionStore;
use crate::error::CollaboratorError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn flipped(&self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

/// A persisted record of one completed focused-work interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub task_id: Option<String>,
    pub phase: Phase,
    pub duration_min: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Single-task focus timer.
///
/// The session is the only writer of `remaining_seconds` and `phase`.
/// `tick()` is a no-op outside Running, so a tick racing a pause can
/// never double-decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroSession {
    config: PomodoroConfig,
    task_id: Option<String>,
    phase: Phase,
    state: SessionState,
    remaining_seconds: u32,
    completed_work_intervals: u32,
    /// When the current phase first started running.
    #[serde(default)]
    phase_started_at: Option<DateTime<Utc>>,
    /// Last wall-clock instant the session observed; used by `resync`.
    #[serde(default)]
    last_observed: Option<DateTime<Utc>>,
    /// Work record awaiting persistence.
    #[serde(default)]
    pending_record: Option<SessionRecord>,
}

impl PomodoroSession {
    pub fn new(config: PomodoroConfig) -> Self {
        let remaining_seconds = config.phase_seconds(Phase::Work);
        Self {
            config,
            task_id: None,
            phase: Phase::Work,
            state: SessionState::Idle,
            remaining_seconds,
            completed_work_intervals: 0,
            phase_started_at: None,
            last_observed: None,
            pending_record: None,
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn completed_work_intervals(&self) -> u32 {
        self.completed_work_intervals
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle/Paused -> Running in the current phase.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Idle | SessionState::Paused => {
                let now = Utc::now();
                self.state = SessionState::Running;
                if self.phase_started_at.is_none() {
                    self.phase_started_at = Some(now);
                }
                self.last_observed = Some(now);
                Some(Event::SessionStarted {
                    phase: self.phase,
                    task_id: self.task_id.clone(),
                    remaining_seconds: self.remaining_seconds,
                    at: now,
                })
            }
            SessionState::Running => None,
        }
    }

    /// Running -> Paused in the same phase.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                self.last_observed = None;
                Some(Event::SessionPaused {
                    phase: self.phase,
                    remaining_seconds: self.remaining_seconds,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// One second of progress. No-op unless Running.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return Some(self.complete_phase(Utc::now()));
        }
        None
    }

    /// Catch up with wall-clock time after the host was suspended.
    ///
    /// Applies the elapsed seconds since the last observation instead of
    /// accumulated tick count. At most one phase completion is folded:
    /// the machine lands in the paused state of the next phase and the
    /// excess is discarded, exactly as if the user had been away past
    /// the end of the interval.
    pub fn resync(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        let Some(last) = self.last_observed else {
            self.last_observed = Some(now);
            return None;
        };
        let elapsed = now.signed_duration_since(last).num_seconds().max(0) as u64;
        self.last_observed = Some(now);

        if elapsed >= u64::from(self.remaining_seconds) {
            self.remaining_seconds = 0;
            return Some(self.complete_phase(now));
        }
        self.remaining_seconds -= elapsed as u32;
        None
    }

    /// Any state -> Idle with the current phase's full duration restored.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = SessionState::Idle;
        self.remaining_seconds = self.config.phase_seconds(self.phase);
        self.phase_started_at = None;
        self.last_observed = None;
        self.task_id = None;
        Some(Event::SessionReset { at: Utc::now() })
    }

    /// Take the work record produced by the last completed work phase,
    /// if any.
    pub fn take_completed_record(&mut self) -> Option<SessionRecord> {
        self.pending_record.take()
    }

    /// Drain the pending work record into the injected store.
    pub fn persist_into(&mut self, store: &dyn SessionStore) -> Result<(), CollaboratorError> {
        if let Some(record) = self.take_completed_record() {
            store.record(&record)?;
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self, now: DateTime<Utc>) -> Event {
        let finished = self.phase;
        if finished == Phase::Work {
            self.completed_work_intervals += 1;
            self.pending_record = Some(SessionRecord {
                id: Uuid::new_v4().to_string(),
                task_id: self.task_id.clone(),
                phase: finished,
                duration_min: self.config.work_min,
                started_at: self.phase_started_at.unwrap_or(now),
                completed_at: now,
            });
        }

        self.phase = finished.flipped();
        self.remaining_seconds = self.config.phase_seconds(self.phase);
        // Deliberate human-in-the-loop break point: the next interval
        // does not auto-start.
        self.state = SessionState::Paused;
        self.phase_started_at = None;
        self.last_observed = None;

        Event::PhaseCompleted {
            completed_phase: finished,
            next_phase: self.phase,
            completed_work_intervals: self.completed_work_intervals,
            at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MemorySessionStore;
    use chrono::Duration;

    fn short_session() -> PomodoroSession {
        // 1 minute work / 1 minute break keeps tick loops small.
        PomodoroSession::new(PomodoroConfig {
            work_min: 1,
            break_min: 1,
        })
    }

    #[test]
    fn start_pause_start() {
        let mut session = short_session();
        assert_eq!(session.state(), SessionState::Idle);

        assert!(session.start().is_some());
        assert_eq!(session.state(), SessionState::Running);

        assert!(session.pause().is_some());
        assert_eq!(session.state(), SessionState::Paused);

        assert!(session.start().is_some());
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.phase(), Phase::Work);
    }

    #[test]
    fn work_runs_down_into_break_paused() {
        let mut session = PomodoroSession::new(PomodoroConfig {
            work_min: 25,
            break_min: 5,
        });
        session.start();

        // 25 minutes of one-second ticks.
        let mut completion = None;
        for _ in 0..25 * 60 {
            if let Some(ev @ Event::PhaseCompleted { .. }) = session.tick() {
                completion = Some(ev);
            }
        }

        assert!(completion.is_some());
        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.completed_work_intervals(), 1);
        assert_eq!(session.remaining_seconds(), 5 * 60);
    }

    #[test]
    fn tick_while_paused_changes_nothing() {
        let mut session = short_session();
        session.start();
        session.tick();
        session.pause();

        let before = session.remaining_seconds();
        for _ in 0..10 {
            assert!(session.tick().is_none());
        }
        assert_eq!(session.remaining_seconds(), before);
    }

    #[test]
    fn tick_while_idle_is_a_no_op() {
        let mut session = short_session();
        assert!(session.tick().is_none());
        assert_eq!(session.remaining_seconds(), 60);
    }

    #[test]
    fn break_completion_does_not_count_as_work() {
        let mut session = short_session();
        session.start();
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.completed_work_intervals(), 1);

        session.start();
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.state(), SessionState::Paused);
        // Still one: breaks do not increment the counter.
        assert_eq!(session.completed_work_intervals(), 1);
    }

    #[test]
    fn reset_restores_current_phase_duration() {
        let mut session = short_session();
        session.start();
        session.tick();
        session.tick();
        assert_eq!(session.remaining_seconds(), 58);

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.remaining_seconds(), 60);
    }

    #[test]
    fn resync_applies_elapsed_wall_clock() {
        let mut session = PomodoroSession::new(PomodoroConfig {
            work_min: 25,
            break_min: 5,
        });
        session.start();

        let later = Utc::now() + Duration::minutes(10);
        assert!(session.resync(later).is_none());
        // Within one second of slack from the start() timestamp.
        assert!(session.remaining_seconds() <= 15 * 60);
        assert!(session.remaining_seconds() >= 15 * 60 - 1);
    }

    #[test]
    fn resync_past_phase_end_folds_one_completion() {
        let mut session = short_session();
        session.start();

        let much_later = Utc::now() + Duration::hours(2);
        let event = session.resync(much_later);
        assert!(matches!(event, Some(Event::PhaseCompleted { .. })));
        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.remaining_seconds(), 60);
    }

    #[test]
    fn resync_while_paused_is_a_no_op() {
        let mut session = short_session();
        session.start();
        session.pause();
        let before = session.remaining_seconds();
        assert!(session.resync(Utc::now() + Duration::hours(1)).is_none());
        assert_eq!(session.remaining_seconds(), before);
    }

    #[test]
    fn completed_work_produces_a_record() {
        let mut session = short_session().with_task("t-1");
        session.start();
        for _ in 0..60 {
            session.tick();
        }

        let store = MemorySessionStore::new();
        session.persist_into(&store).unwrap();
        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].task_id.as_deref(), Some("t-1"));
        assert_eq!(records[0].phase, Phase::Work);
        assert_eq!(records[0].duration_min, 1);

        // Record is drained; persisting twice does not duplicate it.
        session.persist_into(&store).unwrap();
        assert_eq!(store.records().len(), 1);
    }
}
