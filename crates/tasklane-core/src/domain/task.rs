//! Task entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};
use super::ids::{ProjectId, TaskId};

pub(crate) const TASK_DEADLINE_AFTER_PROJECT: &str =
    "Task deadline cannot be later than project deadline";

/// A unit of work, optionally owned by exactly one project.
///
/// Design: same pattern as `Project`.
/// - Fields are readable, but state transitions go through methods.
/// - Every successful transition refreshes `updated_at`.
/// - `is_overdue` is derived on read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,

    /// Owning project. Exclusive: a task belongs to at most one project.
    pub project_id: Option<ProjectId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// New open, unlinked task.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: Option<String>,
        deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            deadline,
            is_completed: false,
            project_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Open -> Completed.
    pub fn mark_as_completed(&mut self) -> DomainResult<()> {
        if self.is_completed {
            return Err(DomainError::conflict("Task is already completed"));
        }
        self.is_completed = true;
        self.touch();
        Ok(())
    }

    /// Completed -> Open.
    pub fn reopen(&mut self) -> DomainResult<()> {
        if !self.is_completed {
            return Err(DomainError::conflict("Task is not completed"));
        }
        self.is_completed = false;
        self.touch();
        Ok(())
    }

    /// Link this task to a project.
    ///
    /// Fails with `Conflict` when already linked, and with `Validation` when
    /// both deadlines are set and the task's is later than the project's.
    pub fn assign_to_project(
        &mut self,
        project_id: ProjectId,
        project_deadline: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        if self.project_id.is_some() {
            return Err(DomainError::conflict("Task is already assigned"));
        }
        if let Some(project_deadline) = project_deadline {
            ensure_within_project_deadline(self.deadline, project_deadline)?;
        }
        self.project_id = Some(project_id);
        self.touch();
        Ok(())
    }

    pub fn unassign_from_project(&mut self) -> DomainResult<()> {
        if self.project_id.is_none() {
            return Err(DomainError::conflict("Task is not assigned to a project"));
        }
        self.project_id = None;
        self.touch();
        Ok(())
    }

    /// Set the deadline (possibly to `None`).
    ///
    /// When the task is linked and `project_deadline` is supplied, the new value
    /// is validated against it first and nothing changes on failure.
    pub fn update_deadline(
        &mut self,
        new_deadline: Option<DateTime<Utc>>,
        project_deadline: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        if self.project_id.is_some()
            && let Some(project_deadline) = project_deadline
        {
            ensure_within_project_deadline(new_deadline, project_deadline)?;
        }
        self.deadline = new_deadline;
        self.touch();
        Ok(())
    }

    /// Clamp the deadline down to `project_deadline`.
    ///
    /// Returns whether the task changed. Never fails: this is the correction
    /// path used by the deadline cascade, not the validating one.
    pub fn adjust_deadline_to_project(&mut self, project_deadline: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if deadline > project_deadline => {
                self.deadline = Some(project_deadline);
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Overdue relative to the wall clock.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    /// Overdue relative to `now`: deadline set, not completed, `now` past it.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if !self.is_completed => now > deadline,
            _ => false,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn ensure_within_project_deadline(
    task_deadline: Option<DateTime<Utc>>,
    project_deadline: DateTime<Utc>,
) -> DomainResult<()> {
    match task_deadline {
        Some(deadline) if deadline > project_deadline => {
            Err(DomainError::validation(TASK_DEADLINE_AFTER_PROJECT))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;
    use ulid::Ulid;

    fn task_with_deadline(deadline: Option<DateTime<Utc>>) -> Task {
        let created = Utc::now() - Duration::days(10);
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            "write report",
            None,
            deadline,
            created,
        )
    }

    fn project_id() -> ProjectId {
        ProjectId::from_ulid(Ulid::new())
    }

    #[test]
    fn new_task_is_open_and_unlinked() {
        let task = task_with_deadline(None);
        assert!(!task.is_completed);
        assert!(task.project_id.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn complete_then_reopen() {
        let mut task = task_with_deadline(None);
        let before = task.updated_at;

        task.mark_as_completed().unwrap();
        assert!(task.is_completed);
        assert!(task.updated_at > before);

        task.reopen().unwrap();
        assert!(!task.is_completed);
    }

    #[test]
    fn completing_twice_is_a_conflict() {
        let mut task = task_with_deadline(None);
        task.mark_as_completed().unwrap();

        let err = task.mark_as_completed().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn reopening_an_open_task_is_a_conflict() {
        let mut task = task_with_deadline(None);
        let err = task.reopen().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[rstest]
    #[case::both_unset(None, None, true)]
    #[case::task_unset(None, Some(2), true)]
    #[case::project_unset(Some(5), None, true)]
    #[case::task_earlier(Some(1), Some(2), true)]
    #[case::equal(Some(2), Some(2), true)]
    #[case::task_later(Some(3), Some(2), false)]
    fn assign_validates_deadlines(
        #[case] task_days: Option<i64>,
        #[case] project_days: Option<i64>,
        #[case] ok: bool,
    ) {
        let base = Utc::now();
        let mut task = task_with_deadline(task_days.map(|d| base + Duration::days(d)));
        let project_deadline = project_days.map(|d| base + Duration::days(d));
        let pid = project_id();

        let result = task.assign_to_project(pid, project_deadline);

        if ok {
            result.unwrap();
            assert_eq!(task.project_id, Some(pid));
        } else {
            assert_eq!(
                result.unwrap_err(),
                DomainError::validation(TASK_DEADLINE_AFTER_PROJECT)
            );
            assert!(task.project_id.is_none());
        }
    }

    #[test]
    fn assigning_a_linked_task_is_a_conflict() {
        let mut task = task_with_deadline(None);
        task.assign_to_project(project_id(), None).unwrap();

        let err = task.assign_to_project(project_id(), None).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn unassign_clears_link() {
        let mut task = task_with_deadline(None);
        task.assign_to_project(project_id(), None).unwrap();

        task.unassign_from_project().unwrap();
        assert!(task.project_id.is_none());

        let err = task.unassign_from_project().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn update_deadline_validates_only_when_linked() {
        let now = Utc::now();
        let project_deadline = now + Duration::days(2);
        let late = now + Duration::days(5);

        let mut unlinked = task_with_deadline(None);
        unlinked.update_deadline(Some(late), Some(project_deadline)).unwrap();
        assert_eq!(unlinked.deadline, Some(late));

        let mut linked = task_with_deadline(None);
        linked.assign_to_project(project_id(), None).unwrap();
        let err = linked
            .update_deadline(Some(late), Some(project_deadline))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(linked.deadline, None);
    }

    #[test]
    fn update_deadline_can_clear() {
        let mut task = task_with_deadline(Some(Utc::now() + Duration::days(1)));
        task.update_deadline(None, None).unwrap();
        assert_eq!(task.deadline, None);
    }

    #[test]
    fn adjust_clamps_only_later_deadlines() {
        let now = Utc::now();
        let project_deadline = now + Duration::days(2);

        let mut later = task_with_deadline(Some(now + Duration::days(5)));
        let before = later.updated_at;
        assert!(later.adjust_deadline_to_project(project_deadline));
        assert_eq!(later.deadline, Some(project_deadline));
        assert!(later.updated_at > before);

        let mut earlier = task_with_deadline(Some(now + Duration::days(1)));
        let untouched = earlier.updated_at;
        assert!(!earlier.adjust_deadline_to_project(project_deadline));
        assert_eq!(earlier.updated_at, untouched);

        let mut none = task_with_deadline(None);
        assert!(!none.adjust_deadline_to_project(project_deadline));
        assert_eq!(none.deadline, None);
    }

    #[rstest]
    #[case::no_deadline(None, false, false)]
    #[case::future(Some(1), false, false)]
    #[case::past(Some(-1), false, true)]
    #[case::past_but_completed(Some(-1), true, false)]
    fn overdue_is_derived(
        #[case] deadline_days: Option<i64>,
        #[case] completed: bool,
        #[case] overdue: bool,
    ) {
        let now = Utc::now();
        let mut task = task_with_deadline(deadline_days.map(|d| now + Duration::days(d)));
        task.is_completed = completed;

        assert_eq!(task.is_overdue_at(now), overdue);
        assert_eq!(task.is_overdue(), overdue);
    }
}
