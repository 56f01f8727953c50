//! Status - タスクの集計
//!
//! Counts used by the `status` command. Overdue is evaluated at the clock's
//! "now", like every other read.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AppResult;
use super::project_use_cases::load_project;
use crate::domain::{ProjectId, Task};
use crate::ports::{Clock, ProjectRepository, TaskRepository};

/// TaskSummary は open / completed / overdue の件数
///
/// `overdue` is a subset of `open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl TaskSummary {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: DateTime<Utc>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            if task.is_completed {
                acc.completed += 1;
            } else {
                acc.open += 1;
            }
            if task.is_overdue_at(now) {
                acc.overdue += 1;
            }
            acc
        })
    }
}

pub struct SummarizeTasksUseCase {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl SummarizeTasksUseCase {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        tasks: Arc<dyn TaskRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            tasks,
            clock,
        }
    }

    /// Summary over every task, or over one project's tasks.
    pub async fn execute(&self, project_id: Option<ProjectId>) -> AppResult<TaskSummary> {
        let tasks = match project_id {
            Some(id) => {
                load_project(self.projects.as_ref(), id).await?;
                self.tasks.get_by_project_id(id).await?
            }
            None => self.tasks.get_all().await?,
        };
        Ok(TaskSummary::from_tasks(&tasks, self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Fixture;
    use crate::domain::ErrorKind;
    use chrono::Duration;
    use ulid::Ulid;

    #[tokio::test]
    async fn counts_open_completed_and_overdue() {
        let fx = Fixture::new();
        let project = fx.project(10).await;
        fx.linked_task(&project, Some(1)).await;
        let mut done = fx.linked_task(&project, Some(1)).await;
        done.mark_as_completed().unwrap();
        fx.tasks.update(done).await.unwrap();
        fx.task(None).await;

        fx.clock.set(fx.now() + Duration::days(2));
        let summarize = SummarizeTasksUseCase::new(fx.project_repo(), fx.task_repo(), fx.clock());

        assert_eq!(
            summarize.execute(None).await.unwrap(),
            TaskSummary {
                total: 3,
                open: 2,
                completed: 1,
                overdue: 1,
            }
        );
        assert_eq!(summarize.execute(Some(project.id)).await.unwrap().total, 2);

        let err = summarize
            .execute(Some(ProjectId::from_ulid(Ulid::new())))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
