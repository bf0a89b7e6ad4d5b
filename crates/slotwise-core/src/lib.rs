//! # Slotwise Core Library
//!
//! Task scheduling and availability engine: computes free calendar time,
//! packs tasks into contiguous slots, scores tasks by urgency and
//! dependency pressure, and drives a focus-timer state machine that
//! records work sessions against a task.
//!
//! ## Architecture
//!
//! - **Interval math**: the pure half-open interval algebra everything
//!   else is built on
//! - **Availability finder**: working-hours policy + busy calendar
//!   intervals -> ordered free slots of a fixed granularity
//! - **Slot packer**: earliest contiguous run that holds a task's
//!   estimated duration
//! - **Priority scorer**: deterministic composite score; ties break by
//!   task creation order
//! - **Rescheduler**: one-pass orchestration of the above with
//!   manual-override handling
//! - **Pomodoro session**: wall-clock-based timer state machine that the
//!   caller drives with `tick()`
//!
//! The engine is a library with no side effects of its own: each pass
//! receives a snapshot of tasks and busy intervals and returns a result
//! the caller applies. External services (calendar, session store,
//! suggestion text) are reached through the narrow traits in
//! [`collaborators`].

pub mod availability;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod events;
pub mod interval;
pub mod packer;
pub mod priority;
pub mod scheduler;
pub mod task;
pub mod timer;

pub use availability::{AvailabilityFinder, DayWindow, Slot, WorkingHoursPolicy};
pub use collaborators::{
    CalendarProvider, CannedSuggestions, EventId, FixedCalendar, MemorySessionStore, SessionStore,
    SuggestionProvider,
};
pub use config::EngineConfig;
pub use error::{CollaboratorError, ConfigError, EngineError, Result, ScheduleError};
pub use events::Event;
pub use interval::Interval;
pub use packer::SlotPacker;
pub use priority::{PrioritizationContext, PriorityScorer, PriorityWeights};
pub use scheduler::{Rescheduler, ScheduleOutcome};
pub use task::{PriorityLabel, ProjectContext, Task};
pub use timer::{Phase, PomodoroConfig, PomodoroSession, SessionRecord, SessionState};
