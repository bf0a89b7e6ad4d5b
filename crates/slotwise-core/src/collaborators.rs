//! External collaborator interfaces.
//!
//! The engine reaches the outside world through three narrow traits: a
//! calendar service for busy intervals and event CRUD, an injected store
//! for session records, and an optional suggestion-text service that
//! annotates computed ranks. Authentication and connection lifecycle are
//! entirely the implementer's concern.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::CollaboratorError;
use crate::interval::Interval;
use crate::task::Task;
use crate::timer::SessionRecord;

/// Identifier of an event created in the external calendar.
pub type EventId = String;

/// Read/write access to the user's calendar.
///
/// Fetching busy intervals is the engine's only asynchronous boundary:
/// a rescheduling pass never starts packing before the full busy set for
/// the requested range has been retrieved.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// All busy intervals overlapping `[range_start, range_end)`.
    async fn list_busy_intervals(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, CollaboratorError>;

    async fn create_event(
        &self,
        interval: Interval,
        metadata: Value,
    ) -> Result<EventId, CollaboratorError>;

    async fn delete_event(&self, event_id: &EventId) -> Result<(), CollaboratorError>;
}

/// Injected persistence for completed focus intervals.
pub trait SessionStore: Send + Sync {
    fn record(&self, record: &SessionRecord) -> Result<(), CollaboratorError>;
}

/// Optional text-generation service for human-readable rank rationale.
///
/// Output is a side channel only: it consumes an already-computed score
/// and must never influence the numeric ranking.
pub trait SuggestionProvider: Send + Sync {
    fn summarize(&self, prompt: &str) -> Result<String, CollaboratorError>;
}

/// Build the rationale prompt for an already-ranked task.
///
/// The score is baked into the prompt text; nothing flows back into the
/// scorer.
pub fn rationale_prompt(task: &Task, score: f32, rank: usize) -> String {
    format!(
        "Task '{}' (estimated {} min{}) was ranked #{} with urgency score {:.1}. \
         Explain in one sentence why it should be worked on in that order.",
        task.title,
        task.estimated_minutes,
        task.due_date
            .map(|d| format!(", due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default(),
        rank,
        score,
    )
}

/// Recover the guard even when another thread panicked mid-write; the
/// in-memory fakes treat poisoning as harmless.
fn lock_fake<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory session store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: Mutex<Vec<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SessionRecord> {
        lock_fake(&self.records).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn record(&self, record: &SessionRecord) -> Result<(), CollaboratorError> {
        lock_fake(&self.records).push(record.clone());
        Ok(())
    }
}

/// Suggestion service that returns a canned line; for tests and offline
/// runs where no text-generation backend is wired up.
#[derive(Debug, Clone)]
pub struct CannedSuggestions {
    reply: String,
}

impl CannedSuggestions {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl SuggestionProvider for CannedSuggestions {
    fn summarize(&self, _prompt: &str) -> Result<String, CollaboratorError> {
        Ok(self.reply.clone())
    }
}

/// Calendar backed by a fixed busy set; for tests and offline scheduling.
#[derive(Debug, Default)]
pub struct FixedCalendar {
    busy: Vec<Interval>,
    events: Mutex<Vec<(EventId, Interval)>>,
}

impl FixedCalendar {
    pub fn new(busy: Vec<Interval>) -> Self {
        Self {
            busy,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn created_events(&self) -> Vec<(EventId, Interval)> {
        lock_fake(&self.events).clone()
    }
}

#[async_trait]
impl CalendarProvider for FixedCalendar {
    async fn list_busy_intervals(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, CollaboratorError> {
        let range = Interval::new(range_start, range_end);
        Ok(self
            .busy
            .iter()
            .copied()
            .filter(|iv| iv.overlaps(&range))
            .collect())
    }

    async fn create_event(
        &self,
        interval: Interval,
        _metadata: Value,
    ) -> Result<EventId, CollaboratorError> {
        let id = uuid::Uuid::new_v4().to_string();
        lock_fake(&self.events).push((id.clone(), interval));
        Ok(id)
    }

    async fn delete_event(&self, event_id: &EventId) -> Result<(), CollaboratorError> {
        lock_fake(&self.events).retain(|(id, _)| id != event_id);
        Ok(())
    }
}
