//! Task use cases, including completion propagation and project linking.

use std::sync::Arc;

use tracing::{debug, info};

use super::dto::{CreateTaskRequest, TaskFilter, TaskRead, UpdateTaskRequest, validated_title};
use super::error::AppResult;
use super::project_use_cases::load_project;
use crate::domain::{DomainError, ProjectCompletionService, ProjectId, Task, TaskId};
use crate::ports::{Clock, IdGenerator, ProjectRepository, TaskRepository};

const TASK_NOT_FOUND: &str = "Task not found";
const TASK_DEADLINE_PASSED: &str = "The task deadline has passed";
const TASK_PROJECT_MISSING: &str = "The project associated with task not found";
const TASK_NOT_IN_PROJECT: &str = "Task is not assigned to this project";

async fn load_task(tasks: &dyn TaskRepository, id: TaskId) -> AppResult<Task> {
    tasks
        .get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(TASK_NOT_FOUND).into())
}

pub struct CreateTaskUseCase {
    tasks: Arc<dyn TaskRepository>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl CreateTaskUseCase {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { tasks, ids, clock }
    }

    /// New tasks start unlinked.
    pub async fn execute(&self, request: CreateTaskRequest) -> AppResult<TaskRead> {
        let title = validated_title(&request.title)?;
        let now = self.clock.now();
        if request.deadline.is_some_and(|deadline| deadline < now) {
            return Err(DomainError::validation(TASK_DEADLINE_PASSED).into());
        }

        let task = Task::new(
            self.ids.generate_task_id(),
            title,
            request.description,
            request.deadline,
            now,
        );
        let saved = self.tasks.save(task).await?;
        info!(task_id = %saved.id, "task created");
        Ok(TaskRead::at(&saved, now))
    }
}

pub struct GetTaskUseCase {
    tasks: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl GetTaskUseCase {
    pub fn new(tasks: Arc<dyn TaskRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { tasks, clock }
    }

    pub async fn execute(&self, id: TaskId) -> AppResult<TaskRead> {
        let task = load_task(self.tasks.as_ref(), id).await?;
        Ok(TaskRead::at(&task, self.clock.now()))
    }
}

/// Merges title, description and deadline.
///
/// A new deadline on a linked task is checked against the project's deadline
/// when the project can be found.
pub struct UpdateTaskUseCase {
    tasks: Arc<dyn TaskRepository>,
    projects: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateTaskUseCase {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        projects: Arc<dyn ProjectRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            projects,
            clock,
        }
    }

    pub async fn execute(&self, id: TaskId, request: UpdateTaskRequest) -> AppResult<TaskRead> {
        let mut task = load_task(self.tasks.as_ref(), id).await?;
        let title = request.title.as_deref().map(validated_title).transpose()?;
        let now = self.clock.now();

        if let Some(deadline) = request.deadline {
            let project_deadline = match task.project_id {
                Some(project_id) => self
                    .projects
                    .get_by_id(project_id)
                    .await?
                    .map(|project| project.deadline),
                None => None,
            };
            task.update_deadline(Some(deadline), project_deadline)?;
        }
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = request.description {
            task.description = Some(description);
        }
        task.updated_at = now;

        let updated = self.tasks.update(task).await?;
        info!(task_id = %id, "task updated");
        Ok(TaskRead::at(&updated, now))
    }
}

/// Completes a task, then lets the completion service decide whether its
/// project completes too.
pub struct CompleteTaskUseCase {
    tasks: Arc<dyn TaskRepository>,
    projects: Arc<dyn ProjectRepository>,
    completion: ProjectCompletionService,
    clock: Arc<dyn Clock>,
}

impl CompleteTaskUseCase {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        projects: Arc<dyn ProjectRepository>,
        completion: ProjectCompletionService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            projects,
            completion,
            clock,
        }
    }

    pub async fn execute(&self, id: TaskId) -> AppResult<TaskRead> {
        let mut task = load_task(self.tasks.as_ref(), id).await?;
        task.mark_as_completed()?;
        let updated = self.tasks.update(task).await?;
        info!(task_id = %id, "task completed");

        if let Some(project_id) = updated.project_id {
            match self.projects.get_by_id(project_id).await? {
                Some(mut project) => {
                    let all_tasks = self.tasks.get_by_project_id(project_id).await?;
                    if self.completion.handle_task_completed(&mut project, &all_tasks)? {
                        self.projects.update(project).await?;
                        info!(%project_id, "project auto-completed");
                    }
                }
                None => debug!(%project_id, "linked project missing, skipping propagation"),
            }
        }

        Ok(TaskRead::at(&updated, self.clock.now()))
    }
}

/// Reopens a task; a completed project it belongs to reopens with it.
pub struct ReopenTaskUseCase {
    tasks: Arc<dyn TaskRepository>,
    projects: Arc<dyn ProjectRepository>,
    completion: ProjectCompletionService,
    clock: Arc<dyn Clock>,
}

impl ReopenTaskUseCase {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        projects: Arc<dyn ProjectRepository>,
        completion: ProjectCompletionService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            projects,
            completion,
            clock,
        }
    }

    pub async fn execute(&self, id: TaskId) -> AppResult<TaskRead> {
        let mut task = load_task(self.tasks.as_ref(), id).await?;
        task.reopen()?;

        if let Some(project_id) = task.project_id {
            let mut project = self
                .projects
                .get_by_id(project_id)
                .await?
                .ok_or_else(|| DomainError::not_found(TASK_PROJECT_MISSING))?;
            if self.completion.handle_task_reopened(&mut project)? {
                self.projects.update(project).await?;
                info!(%project_id, "project reopened with its task");
            }
        }

        let updated = self.tasks.update(task).await?;
        info!(task_id = %id, "task reopened");
        Ok(TaskRead::at(&updated, self.clock.now()))
    }
}

pub struct DeleteTaskUseCase {
    tasks: Arc<dyn TaskRepository>,
}

impl DeleteTaskUseCase {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn execute(&self, id: TaskId) -> AppResult<()> {
        load_task(self.tasks.as_ref(), id).await?;
        self.tasks.delete(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

pub struct LinkTaskToProjectUseCase {
    tasks: Arc<dyn TaskRepository>,
    projects: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl LinkTaskToProjectUseCase {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        projects: Arc<dyn ProjectRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            projects,
            clock,
        }
    }

    pub async fn execute(&self, task_id: TaskId, project_id: ProjectId) -> AppResult<TaskRead> {
        let mut task = load_task(self.tasks.as_ref(), task_id).await?;
        let project = load_project(self.projects.as_ref(), project_id).await?;
        task.assign_to_project(project.id, Some(project.deadline))?;

        let updated = self.tasks.update(task).await?;
        info!(%task_id, %project_id, "task linked");
        Ok(TaskRead::at(&updated, self.clock.now()))
    }
}

pub struct UnlinkTaskFromProjectUseCase {
    tasks: Arc<dyn TaskRepository>,
    projects: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl UnlinkTaskFromProjectUseCase {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        projects: Arc<dyn ProjectRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            projects,
            clock,
        }
    }

    pub async fn execute(&self, task_id: TaskId, project_id: ProjectId) -> AppResult<TaskRead> {
        let mut task = load_task(self.tasks.as_ref(), task_id).await?;
        load_project(self.projects.as_ref(), project_id).await?;
        if task.project_id.is_some_and(|linked| linked != project_id) {
            return Err(DomainError::conflict(TASK_NOT_IN_PROJECT).into());
        }
        task.unassign_from_project()?;

        let updated = self.tasks.update(task).await?;
        info!(%task_id, %project_id, "task unlinked");
        Ok(TaskRead::at(&updated, self.clock.now()))
    }
}

pub struct GetFilteredTasksUseCase {
    tasks: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl GetFilteredTasksUseCase {
    pub fn new(tasks: Arc<dyn TaskRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { tasks, clock }
    }

    pub async fn execute(&self, filter: TaskFilter) -> AppResult<Vec<TaskRead>> {
        let now = self.clock.now();
        let tasks = match filter.project_id {
            Some(project_id) => self.tasks.get_by_project_id(project_id).await?,
            None => self.tasks.get_all().await?,
        };
        Ok(tasks
            .iter()
            .filter(|task| filter.matches(task, now))
            .map(|task| TaskRead::at(task, now))
            .collect())
    }
}
