//! Deadline cascade: keeping task deadlines within their project's.

use super::errors::{DomainError, DomainResult};
use super::events::ProjectDeadlineChangedEvent;
use super::task::Task;

/// Reacts to a project deadline change against the project's tasks.
///
/// Stateless. The auto-adjust flag is passed per call because it belongs to
/// the orchestrating use case, not to this rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlineEnforcementService;

impl DeadlineEnforcementService {
    pub fn new() -> Self {
        Self
    }

    /// Returns the number of tasks whose deadline was clamped.
    ///
    /// With `auto_adjust == false` any conflict fails the whole call and no
    /// task is touched.
    pub fn handle_project_deadline_changed(
        &self,
        event: &ProjectDeadlineChangedEvent,
        tasks: &mut [Task],
        auto_adjust: bool,
    ) -> DomainResult<usize> {
        let Some(new_deadline) = event.new_deadline else {
            return Ok(0);
        };

        let conflicting = tasks
            .iter()
            .filter(|task| task.deadline.is_some_and(|d| d > new_deadline))
            .count();
        if conflicting == 0 {
            return Ok(0);
        }
        if !auto_adjust {
            return Err(DomainError::validation(
                "Project contains task(s) with later deadline(s)",
            ));
        }

        let adjusted = tasks
            .iter_mut()
            .map(|task| task.adjust_deadline_to_project(new_deadline))
            .filter(|changed| *changed)
            .count();
        Ok(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{ProjectId, TaskId};
    use chrono::{DateTime, Duration, Utc};
    use ulid::Ulid;

    fn task(deadline: Option<DateTime<Utc>>) -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            "t",
            None,
            deadline,
            Utc::now() - Duration::days(1),
        )
    }

    fn event(new_deadline: Option<DateTime<Utc>>) -> ProjectDeadlineChangedEvent {
        ProjectDeadlineChangedEvent {
            project_id: ProjectId::from_ulid(Ulid::new()),
            old_deadline: None,
            new_deadline,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn empty_new_deadline_is_a_no_op() {
        let far = Utc::now() + Duration::days(100);
        let mut tasks = vec![task(Some(far))];

        let adjusted = DeadlineEnforcementService::new()
            .handle_project_deadline_changed(&event(None), &mut tasks, false)
            .unwrap();

        assert_eq!(adjusted, 0);
        assert_eq!(tasks[0].deadline, Some(far));
    }

    #[test]
    fn no_conflicts_is_a_no_op_even_without_auto_adjust() {
        let now = Utc::now();
        let mut tasks = vec![task(Some(now + Duration::days(1))), task(None)];

        let adjusted = DeadlineEnforcementService::new()
            .handle_project_deadline_changed(
                &event(Some(now + Duration::days(2))),
                &mut tasks,
                false,
            )
            .unwrap();

        assert_eq!(adjusted, 0);
    }

    #[test]
    fn conflicts_without_auto_adjust_fail_and_mutate_nothing() {
        let now = Utc::now();
        let late = now + Duration::days(10);
        let mut tasks = vec![task(Some(late))];
        let before = tasks[0].clone();

        let err = DeadlineEnforcementService::new()
            .handle_project_deadline_changed(
                &event(Some(now + Duration::days(2))),
                &mut tasks,
                false,
            )
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::validation("Project contains task(s) with later deadline(s)")
        );
        assert_eq!(tasks[0], before);
    }

    #[test]
    fn conflicts_with_auto_adjust_are_clamped() {
        let now = Utc::now();
        let new_deadline = now + Duration::days(2);
        let early = now + Duration::days(1);
        let mut tasks = vec![
            task(Some(now + Duration::days(10))),
            task(Some(early)),
            task(None),
        ];

        let adjusted = DeadlineEnforcementService::new()
            .handle_project_deadline_changed(&event(Some(new_deadline)), &mut tasks, true)
            .unwrap();

        assert_eq!(adjusted, 1);
        assert_eq!(tasks[0].deadline, Some(new_deadline));
        assert_eq!(tasks[1].deadline, Some(early));
        assert_eq!(tasks[2].deadline, None);
    }
}
