//! Project entity and its pending-event buffer.

use chrono::{DateTime, Utc};

use super::errors::{DomainError, DomainResult};
use super::events::{DomainEvent, ProjectDeadlineChangedEvent};
use super::ids::ProjectId;
use super::task::Task;

/// Project: a deadline-bound container of tasks.
///
/// The project never holds its tasks; callers pass the current task set in.
/// Domain events are buffered here until a use case drains them.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Transient. Not persisted and not part of equality.
    pending_events: Vec<DomainEvent>,
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.deadline == other.deadline
            && self.is_completed == other.is_completed
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
    }
}

impl Eq for Project {}

impl Project {
    /// New open project.
    pub fn new(
        id: ProjectId,
        title: impl Into<String>,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::restore(id, title, deadline, false, now, now)
    }

    /// Rebuild a project from stored state (no pending events).
    pub fn restore(
        id: ProjectId,
        title: impl Into<String>,
        deadline: DateTime<Utc>,
        is_completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            deadline,
            is_completed,
            created_at,
            updated_at,
            pending_events: Vec::new(),
        }
    }

    /// Open -> Completed.
    ///
    /// `tasks` is the full set of tasks owned by this project. An empty set
    /// counts as "all complete".
    pub fn mark_as_completed(&mut self, tasks: &[Task]) -> DomainResult<()> {
        if self.is_completed {
            return Err(DomainError::conflict("Project is already completed"));
        }
        if tasks.iter().any(|task| !task.is_completed) {
            return Err(DomainError::validation(
                "Cannot complete project. Task(s) are still incomplete",
            ));
        }
        self.is_completed = true;
        self.touch();
        Ok(())
    }

    /// Completed -> Open.
    pub fn reopen(&mut self) -> DomainResult<()> {
        if !self.is_completed {
            return Err(DomainError::conflict("Project is not completed"));
        }
        self.is_completed = false;
        self.touch();
        Ok(())
    }

    /// Move the deadline. Records a `ProjectDeadlineChangedEvent` only when the
    /// value actually changes; `updated_at` is refreshed either way.
    pub fn update_deadline(&mut self, new_deadline: DateTime<Utc>) {
        let old_deadline = self.deadline;
        self.deadline = new_deadline;
        self.touch();

        if old_deadline != new_deadline {
            self.pending_events.push(
                ProjectDeadlineChangedEvent {
                    project_id: self.id,
                    old_deadline: Some(old_deadline),
                    new_deadline: Some(new_deadline),
                    occurred_at: self.updated_at,
                }
                .into(),
            );
        }
    }

    /// Whether completing one more task should complete the project.
    pub fn should_auto_complete(&self, tasks: &[Task], auto_complete_enabled: bool) -> bool {
        if !auto_complete_enabled || self.is_completed {
            return false;
        }
        !tasks.is_empty() && tasks.iter().all(|task| task.is_completed)
    }

    /// Drain the pending events. A second call right after returns nothing.
    pub fn collect_domain_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
