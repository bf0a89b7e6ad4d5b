//! Rescheduling orchestrator.
//!
//! One pass wires the availability finder, priority scorer, and slot
//! packer together:
//! 1. manual overrides become busy time and are excluded from packing
//! 2. free slots are computed once for the whole pass
//! 3. every pending task gets a prioritization context, including a
//!    dry-run fit count against the *unconsumed* pool so placement order
//!    cannot feed back into priorities
//! 4. tasks are packed in priority order, consuming slots as they go
//!
//! A task that cannot be placed maps to `None` in the outcome. That is a
//! normal, reportable result ("needs manual scheduling"), never an error.
//! The pass itself has no side effects; callers apply the returned map.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityFinder, Slot, WorkingHoursPolicy};
use crate::collaborators::CalendarProvider;
use crate::error::{EngineError, Result};
use crate::events::Event;
use crate::interval::Interval;
use crate::packer::SlotPacker;
use crate::priority::{PrioritizationContext, PriorityScorer, PriorityWeights};
use crate::task::{PriorityLabel, ProjectContext, Task};

/// Result of one rescheduling pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Echo of the caller-supplied request sequence number. The engine
    /// holds no session state; callers discard stale responses by
    /// comparing this against their latest request.
    pub seq: u64,
    /// Task id -> assigned interval, or `None` when the task did not fit
    /// before the range end. Manual overrides are echoed as assigned.
    pub assignments: BTreeMap<String, Option<Interval>>,
    /// Auto-scheduled task ids in the priority order they were packed.
    pub ranked: Vec<String>,
    /// Numeric scores for the auto-scheduled tasks (rationale input).
    pub scores: BTreeMap<String, f32>,
}

impl ScheduleOutcome {
    pub fn placed(&self) -> usize {
        self.assignments.values().filter(|a| a.is_some()).count()
    }

    pub fn unplaced(&self) -> usize {
        self.assignments.values().filter(|a| a.is_none()).count()
    }

    /// Priority label proposed for the task store write-back.
    pub fn label_for(&self, task_id: &str) -> Option<PriorityLabel> {
        self.scores.get(task_id).map(|s| PriorityLabel::from_score(*s))
    }

    pub fn event(&self, at: DateTime<Utc>) -> Event {
        Event::ScheduleComputed {
            seq: self.seq,
            placed: self.placed(),
            unplaced: self.unplaced(),
            at,
        }
    }
}

/// Orchestrates availability, scoring, and packing for a batch of tasks.
#[derive(Debug, Clone)]
pub struct Rescheduler {
    policy: WorkingHoursPolicy,
    finder: AvailabilityFinder,
    packer: SlotPacker,
    weights: PriorityWeights,
}

impl Rescheduler {
    pub fn new(policy: WorkingHoursPolicy, granularity_min: i64) -> Self {
        Self {
            policy,
            finder: AvailabilityFinder::new(granularity_min),
            packer: SlotPacker::new(granularity_min),
            weights: PriorityWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: PriorityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Propose a schedule for `tasks` within `[range_start, range_end)`.
    ///
    /// Pure: the same snapshot of tasks and busy intervals always yields
    /// the same outcome. Fails only on a malformed range or policy.
    #[allow(clippy::too_many_arguments)]
    pub fn reschedule(
        &self,
        tasks: &[Task],
        projects: &HashMap<String, ProjectContext>,
        busy: &[Interval],
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        now: DateTime<Utc>,
        seq: u64,
    ) -> Result<ScheduleOutcome> {
        let mut assignments: BTreeMap<String, Option<Interval>> = BTreeMap::new();
        let mut busy_all: Vec<Interval> = busy.to_vec();

        // Manual overrides are authoritative: echo them and treat their
        // interval as consumed busy time for everyone else.
        let mut pending: Vec<&Task> = Vec::new();
        for task in tasks {
            match task.scheduled_interval {
                Some(interval) => {
                    busy_all.push(interval);
                    assignments.insert(task.id.clone(), Some(interval));
                }
                None => pending.push(task),
            }
        }

        let slots = self
            .finder
            .find_slots(&self.policy, &busy_all, range_start, range_end)?;

        let contexts: Vec<(&Task, PrioritizationContext)> = pending
            .iter()
            .map(|&task| (task, self.context_for(task, tasks, projects, &slots)))
            .collect();

        let scorer = PriorityScorer::with_weights(now, self.weights);
        let mut scores = BTreeMap::new();
        for (task, ctx) in &contexts {
            scores.insert(task.id.clone(), scorer.score(ctx));
        }
        let ordered = scorer.rank(&contexts);

        let mut pool: Vec<Slot> = slots;
        let mut ranked = Vec::with_capacity(ordered.len());
        for task in ordered {
            ranked.push(task.id.clone());
            match self.packer.pack(task.estimated_minutes, &pool) {
                Some(placed) => {
                    pool.retain(|slot| !placed.contains(&slot.interval()));
                    assignments.insert(task.id.clone(), Some(placed));
                }
                None => {
                    assignments.insert(task.id.clone(), None);
                }
            }
        }

        Ok(ScheduleOutcome {
            seq,
            assignments,
            ranked,
            scores,
        })
    }

    /// Fetch the busy set from the calendar, then run a pure pass.
    ///
    /// Packing never starts on partial data: the full busy-interval set
    /// for the range is awaited first, and calendar failures propagate
    /// unchanged with no retry.
    #[allow(clippy::too_many_arguments)]
    pub async fn reschedule_via(
        &self,
        calendar: &dyn CalendarProvider,
        tasks: &[Task],
        projects: &HashMap<String, ProjectContext>,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        now: DateTime<Utc>,
        seq: u64,
    ) -> Result<ScheduleOutcome> {
        let busy = calendar
            .list_busy_intervals(range_start, range_end)
            .await
            .map_err(EngineError::Collaborator)?;
        self.reschedule(tasks, projects, &busy, range_start, range_end, now, seq)
    }

    /// Derive the scoring context for one pending task.
    ///
    /// `available_slot_count` is a dry run against the full slot pool,
    /// deliberately ignoring what earlier tasks will consume.
    fn context_for(
        &self,
        task: &Task,
        all_tasks: &[Task],
        projects: &HashMap<String, ProjectContext>,
        slots: &[Slot],
    ) -> PrioritizationContext {
        let blocked_on_this = all_tasks
            .iter()
            .filter(|other| other.id != task.id && other.dependencies.contains(&task.id))
            .count() as u32;

        let project = task
            .project_id
            .as_ref()
            .and_then(|id| projects.get(id))
            .copied()
            .unwrap_or_default();

        PrioritizationContext {
            due_date: task.due_date,
            project_weight: project.project_weight,
            client_weight: project.client_weight,
            dependency_count: blocked_on_this,
            estimated_minutes: task.estimated_minutes,
            available_slot_count: self.packer.fit_count(task.estimated_minutes, slots) as u32,
        }
    }
}
