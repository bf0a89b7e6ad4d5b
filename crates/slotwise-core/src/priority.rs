//! Task priority scoring.
//!
//! Produces a composite score (0-100 scale, higher = more urgent) from:
//! - urgency (inverse of days until due; overdue tasks get the maximum)
//! - project and client weights
//! - dependency pressure (how many tasks are blocked on this one)
//! - a scarcity boost when the task's duration is hard to fit into the
//!   current availability
//!
//! The score is a pure function of the context and the injected "now", so
//! identical inputs always produce identical ordering. Ties are broken by
//! task creation order, never by iteration order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Weights for each scoring factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriorityWeights {
    #[serde(default = "default_urgency_weight")]
    pub urgency: f32,
    #[serde(default = "default_project_weight")]
    pub project: f32,
    #[serde(default = "default_client_weight")]
    pub client: f32,
    #[serde(default = "default_dependency_weight")]
    pub dependency: f32,
    #[serde(default = "default_scarcity_weight")]
    pub scarcity: f32,
}

fn default_urgency_weight() -> f32 {
    0.35
}
fn default_project_weight() -> f32 {
    0.15
}
fn default_client_weight() -> f32 {
    0.15
}
fn default_dependency_weight() -> f32 {
    0.20
}
fn default_scarcity_weight() -> f32 {
    0.15
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            urgency: default_urgency_weight(),
            project: default_project_weight(),
            client: default_client_weight(),
            dependency: default_dependency_weight(),
            scarcity: default_scarcity_weight(),
        }
    }
}

/// Scoring inputs derived fresh per scheduling pass; never persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrioritizationContext {
    pub due_date: Option<DateTime<Utc>>,
    /// 0-100 project importance.
    pub project_weight: f32,
    /// 0-100 client importance.
    pub client_weight: f32,
    /// Count of tasks blocked on this one.
    pub dependency_count: u32,
    pub estimated_minutes: u32,
    /// Dry-run count of placements that could hold this task's duration.
    pub available_slot_count: u32,
}

/// Deterministic composite scorer.
///
/// "Now" is injected at construction so tests never need to mock time.
#[derive(Debug, Clone, Copy)]
pub struct PriorityScorer {
    weights: PriorityWeights,
    now: DateTime<Utc>,
}

impl PriorityScorer {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            weights: PriorityWeights::default(),
            now,
        }
    }

    pub fn with_weights(now: DateTime<Utc>, weights: PriorityWeights) -> Self {
        Self { weights, now }
    }

    /// Composite score on a 0-100 scale; higher = more urgent.
    pub fn score(&self, ctx: &PrioritizationContext) -> f32 {
        let w = &self.weights;
        w.urgency * self.urgency_score(ctx.due_date)
            + w.project * ctx.project_weight.clamp(0.0, 100.0)
            + w.client * ctx.client_weight.clamp(0.0, 100.0)
            + w.dependency * dependency_score(ctx.dependency_count)
            + w.scarcity * scarcity_score(ctx.available_slot_count)
    }

    /// Urgency from deadline proximity (0-100).
    ///
    /// Overdue tasks saturate at 100; otherwise the score decays with the
    /// number of days until due. Tasks without a due date get a small
    /// base so they still surface eventually.
    fn urgency_score(&self, due_date: Option<DateTime<Utc>>) -> f32 {
        let Some(due) = due_date else {
            return 5.0;
        };
        let hours = due.signed_duration_since(self.now).num_hours();
        if hours <= 0 {
            return 100.0;
        }
        let days = hours as f32 / 24.0;
        100.0 / (1.0 + days)
    }

    /// Rank a batch of `(task, context)` pairs, most urgent first.
    ///
    /// The sort is stable with ties broken by creation time, then id, so
    /// the ordering is reproducible regardless of input order.
    pub fn rank<'a>(&self, tasks: &[(&'a Task, PrioritizationContext)]) -> Vec<&'a Task> {
        let mut scored: Vec<(&Task, f32)> = tasks
            .iter()
            .map(|(task, ctx)| (*task, self.score(ctx)))
            .collect();
        scored.sort_by(|(a, sa), (b, sb)| {
            sb.total_cmp(sa)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        scored.into_iter().map(|(task, _)| task).collect()
    }
}

/// Pressure from blocking other tasks (0-100); saturates at five
/// blocked tasks.
fn dependency_score(blocked_count: u32) -> f32 {
    (blocked_count as f32 * 20.0).min(100.0)
}

/// Scarcity boost (0-100): tasks that barely fit the current
/// availability should be scheduled first, all else equal.
fn scarcity_score(available_slot_count: u32) -> f32 {
    100.0 / (1.0 + available_slot_count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn ctx() -> PrioritizationContext {
        PrioritizationContext {
            due_date: None,
            project_weight: 50.0,
            client_weight: 50.0,
            dependency_count: 0,
            estimated_minutes: 60,
            available_slot_count: 10,
        }
    }

    #[test]
    fn overdue_beats_everything_on_urgency() {
        let scorer = PriorityScorer::new(now());
        let overdue = PrioritizationContext {
            due_date: Some(now() - Duration::hours(1)),
            ..ctx()
        };
        let next_month = PrioritizationContext {
            due_date: Some(now() + Duration::days(30)),
            ..ctx()
        };
        assert!(scorer.score(&overdue) > scorer.score(&next_month));
    }

    #[test]
    fn due_tomorrow_outranks_due_in_thirty_days() {
        let scorer = PriorityScorer::new(now());
        let soon = PrioritizationContext {
            due_date: Some(now() + Duration::days(1)),
            ..ctx()
        };
        let later = PrioritizationContext {
            due_date: Some(now() + Duration::days(30)),
            ..ctx()
        };
        assert!(scorer.score(&soon) > scorer.score(&later));
    }

    #[test]
    fn score_is_monotone_in_every_component() {
        let scorer = PriorityScorer::new(now());
        let low = PrioritizationContext {
            due_date: Some(now() + Duration::days(10)),
            project_weight: 20.0,
            client_weight: 20.0,
            dependency_count: 1,
            estimated_minutes: 60,
            available_slot_count: 8,
        };
        let high = PrioritizationContext {
            due_date: Some(now() + Duration::days(2)),
            project_weight: 60.0,
            client_weight: 60.0,
            dependency_count: 3,
            estimated_minutes: 60,
            available_slot_count: 2,
        };
        assert!(scorer.score(&high) > scorer.score(&low));
    }

    #[test]
    fn scarcity_boosts_hard_to_fit_tasks() {
        let scorer = PriorityScorer::new(now());
        let scarce = PrioritizationContext {
            available_slot_count: 0,
            ..ctx()
        };
        let plentiful = PrioritizationContext {
            available_slot_count: 40,
            ..ctx()
        };
        assert!(scorer.score(&scarce) > scorer.score(&plentiful));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let scorer = PriorityScorer::new(now());
        let c = ctx();
        assert_eq!(scorer.score(&c), scorer.score(&c));
    }

    #[test]
    fn ties_break_by_creation_order() {
        let scorer = PriorityScorer::new(now());
        let older = Task::new("b", "older", 30).with_created_at(now() - Duration::days(2));
        let newer = Task::new("a", "newer", 30).with_created_at(now() - Duration::days(1));

        // Same context => same score; listing order must not matter.
        let ranked = scorer.rank(&[(&newer, ctx()), (&older, ctx())]);
        assert_eq!(ranked[0].id, "b");
        assert_eq!(ranked[1].id, "a");
    }

    #[test]
    fn rank_orders_by_score_descending() {
        let scorer = PriorityScorer::new(now());
        let urgent = Task::new("u", "urgent", 30);
        let relaxed = Task::new("r", "relaxed", 30);
        let urgent_ctx = PrioritizationContext {
            due_date: Some(now() + Duration::hours(4)),
            ..ctx()
        };
        let relaxed_ctx = PrioritizationContext {
            due_date: Some(now() + Duration::days(20)),
            ..ctx()
        };

        let ranked = scorer.rank(&[(&relaxed, relaxed_ctx), (&urgent, urgent_ctx)]);
        assert_eq!(ranked[0].id, "u");
    }
}
