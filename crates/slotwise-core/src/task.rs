//! Task types shared between the scheduler and its callers.
//!
//! Task records are owned by the surrounding application's task store;
//! the engine reads them and proposes mutations (an assigned interval and
//! a priority label), it never owns task identity or lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Coarse priority label written back to the task store after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
}

impl PriorityLabel {
    /// Map a numeric rank (0-100 scale, higher = more urgent) to a label.
    pub fn from_score(score: f32) -> Self {
        if score >= 60.0 {
            Self::High
        } else if score >= 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The scheduling-relevant subset of a task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Estimated effort in minutes; rounded up to slot granularity when
    /// packed.
    pub estimated_minutes: u32,
    pub due_date: Option<DateTime<Utc>>,
    /// Ids of tasks this task depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub project_id: Option<String>,
    /// Set by the scheduler, or directly by a drag-and-drop action. A
    /// manually set interval is authoritative until the next full
    /// rescheduling pass.
    #[serde(default)]
    pub scheduled_interval: Option<Interval>,
    #[serde(default = "default_priority")]
    pub priority: PriorityLabel,
    pub created_at: DateTime<Utc>,
}

fn default_priority() -> PriorityLabel {
    PriorityLabel::Medium
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, estimated_minutes: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            estimated_minutes,
            due_date: None,
            dependencies: Vec::new(),
            project_id: None,
            scheduled_interval: None,
            priority: PriorityLabel::Medium,
            created_at: Utc::now(),
        }
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Pin the task to an interval (manual override).
    pub fn with_scheduled_interval(mut self, interval: Interval) -> Self {
        self.scheduled_interval = Some(interval);
        self
    }

    /// True when a drag-and-drop (or previous pass) already placed this
    /// task.
    pub fn is_manually_scheduled(&self) -> bool {
        self.scheduled_interval.is_some()
    }
}

/// Weighting context a project/client contributes to its tasks' scores.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProjectContext {
    /// 0-100 importance of the project.
    pub project_weight: f32,
    /// 0-100 importance of the client behind the project.
    pub client_weight: f32,
}
