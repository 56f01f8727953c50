//! Project use cases.
//!
//! Each use case loads by id, runs the entity or service operation, persists
//! and returns a [`ProjectRead`] (or [`TaskRead`] for the project's tasks).

use std::sync::Arc;

use tracing::{info, warn};

use super::dto::{
    CreateProjectRequest, ProjectRead, TaskRead, UpdateProjectRequest, validated_title,
};
use super::error::AppResult;
use super::handler::ProjectDeadlineChangedHandler;
use crate::domain::{DomainError, Project, ProjectId};
use crate::ports::{Clock, IdGenerator, ProjectRepository, TaskRepository};

pub(crate) const PROJECT_NOT_FOUND: &str = "Project not found";
const PROJECT_DEADLINE_PASSED: &str = "Project deadline has passed";

pub(crate) async fn load_project(
    projects: &dyn ProjectRepository,
    id: ProjectId,
) -> AppResult<Project> {
    projects
        .get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(PROJECT_NOT_FOUND).into())
}

pub struct CreateProjectUseCase {
    projects: Arc<dyn ProjectRepository>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl CreateProjectUseCase {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            ids,
            clock,
        }
    }

    pub async fn execute(&self, request: CreateProjectRequest) -> AppResult<ProjectRead> {
        let title = validated_title(&request.title)?;
        let now = self.clock.now();
        if request.deadline < now {
            return Err(DomainError::validation(PROJECT_DEADLINE_PASSED).into());
        }

        let project = Project::new(self.ids.generate_project_id(), title, request.deadline, now);
        let saved = self.projects.save(project).await?;
        info!(project_id = %saved.id, deadline = %saved.deadline, "project created");
        Ok(ProjectRead::from(&saved))
    }
}

pub struct GetProjectUseCase {
    projects: Arc<dyn ProjectRepository>,
}

impl GetProjectUseCase {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn execute(&self, id: ProjectId) -> AppResult<ProjectRead> {
        let project = load_project(self.projects.as_ref(), id).await?;
        Ok(ProjectRead::from(&project))
    }
}

pub struct ListProjectsUseCase {
    projects: Arc<dyn ProjectRepository>,
}

impl ListProjectsUseCase {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn execute(&self) -> AppResult<Vec<ProjectRead>> {
        let projects = self.projects.get_all().await?;
        Ok(projects.iter().map(ProjectRead::from).collect())
    }
}

/// Updates title and/or deadline.
///
/// A deadline change runs first: the project records the change, the drained
/// events go through the deadline handler, and only then is the title merged
/// and the project stored. A failing cascade leaves the stored project as it
/// was.
pub struct UpdateProjectUseCase {
    projects: Arc<dyn ProjectRepository>,
    deadline_handler: Arc<ProjectDeadlineChangedHandler>,
    clock: Arc<dyn Clock>,
    auto_adjust_task_deadlines: bool,
}

impl UpdateProjectUseCase {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        deadline_handler: Arc<ProjectDeadlineChangedHandler>,
        clock: Arc<dyn Clock>,
        auto_adjust_task_deadlines: bool,
    ) -> Self {
        Self {
            projects,
            deadline_handler,
            clock,
            auto_adjust_task_deadlines,
        }
    }

    pub async fn execute(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> AppResult<ProjectRead> {
        let mut project = load_project(self.projects.as_ref(), id).await?;
        let title = request.title.as_deref().map(validated_title).transpose()?;
        let now = self.clock.now();

        if let Some(deadline) = request.deadline {
            if deadline < now {
                return Err(DomainError::validation(PROJECT_DEADLINE_PASSED).into());
            }
            project.update_deadline(deadline);
            for event in project.collect_domain_events() {
                let adjusted = self
                    .deadline_handler
                    .dispatch(&event, self.auto_adjust_task_deadlines)
                    .await
                    .inspect_err(|err| {
                        warn!(project_id = %id, event = event.name(), %err, "deadline cascade rejected");
                    })?;
                info!(project_id = %id, event = event.name(), adjusted, "domain event handled");
            }
        }

        if let Some(title) = title {
            project.title = title;
            project.updated_at = now;
        }

        let updated = self.projects.update(project).await?;
        info!(project_id = %updated.id, "project updated");
        Ok(ProjectRead::from(&updated))
    }
}

/// Completes a project whose tasks are all completed.
pub struct CompleteProjectUseCase {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl CompleteProjectUseCase {
    pub fn new(projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { projects, tasks }
    }

    pub async fn execute(&self, id: ProjectId) -> AppResult<ProjectRead> {
        let mut project = load_project(self.projects.as_ref(), id).await?;
        let tasks = self.tasks.get_by_project_id(id).await?;
        project.mark_as_completed(&tasks)?;

        let updated = self.projects.update(project).await?;
        info!(project_id = %id, tasks = tasks.len(), "project completed");
        Ok(ProjectRead::from(&updated))
    }
}

pub struct ReopenProjectUseCase {
    projects: Arc<dyn ProjectRepository>,
}

impl ReopenProjectUseCase {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn execute(&self, id: ProjectId) -> AppResult<ProjectRead> {
        let mut project = load_project(self.projects.as_ref(), id).await?;
        project.reopen()?;

        let updated = self.projects.update(project).await?;
        info!(project_id = %id, "project reopened");
        Ok(ProjectRead::from(&updated))
    }
}

/// Deletes a project after unlinking its tasks. The tasks themselves stay.
pub struct DeleteProjectUseCase {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl DeleteProjectUseCase {
    pub fn new(projects: Arc<dyn ProjectRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { projects, tasks }
    }

    pub async fn execute(&self, id: ProjectId) -> AppResult<()> {
        load_project(self.projects.as_ref(), id).await?;

        let linked = self.tasks.get_by_project_id(id).await?;
        let unlinked = linked.len();
        for mut task in linked {
            task.unassign_from_project()?;
            self.tasks.update(task).await?;
        }

        self.projects.delete(id).await?;
        info!(project_id = %id, unlinked, "project deleted");
        Ok(())
    }
}

pub struct ListProjectTasksUseCase {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl ListProjectTasksUseCase {
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

    pub async fn execute(&self, id: ProjectId) -> AppResult<Vec<TaskRead>> {
        load_project(self.projects.as_ref(), id).await?;
        let now = self.clock.now();
        let tasks = self.tasks.get_by_project_id(id).await?;
        Ok(tasks.iter().map(|task| TaskRead::at(task, now)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Fixture;
    use crate::domain::ErrorKind;
    use chrono::Duration;
    use ulid::Ulid;

    fn update_use_case(fx: &Fixture, auto_adjust: bool) -> UpdateProjectUseCase {
        UpdateProjectUseCase::new(
            fx.project_repo(),
            Arc::new(ProjectDeadlineChangedHandler::new(fx.task_repo())),
            fx.clock(),
            auto_adjust,
        )
    }

    #[tokio::test]
    async fn create_rejects_past_deadline_and_blank_title() {
        let fx = Fixture::new();
        let create = CreateProjectUseCase::new(fx.project_repo(), fx.ids.clone(), fx.clock());

        let err = create
            .execute(CreateProjectRequest {
                title: "late".to_string(),
                deadline: fx.now() - Duration::days(1),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Project deadline has passed");

        let err = create
            .execute(CreateProjectRequest {
                title: "  ".to_string(),
                deadline: fx.now() + Duration::days(1),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fx.projects.is_empty().await);
    }

    #[tokio::test]
    async fn create_stores_an_open_project() {
        let fx = Fixture::new();
        let create = CreateProjectUseCase::new(fx.project_repo(), fx.ids.clone(), fx.clock());
        let deadline = fx.now() + Duration::days(3);

        let read = create
            .execute(CreateProjectRequest {
                title: "Launch".to_string(),
                deadline,
            })
            .await
            .unwrap();

        assert!(!read.is_completed);
        assert_eq!(read.deadline, deadline);
        assert_eq!(read.created_at, fx.now());
        assert_eq!(fx.stored_project(read.id).await.title, "Launch");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let fx = Fixture::new();
        let missing = ProjectId::from_ulid(Ulid::new());

        let err = GetProjectUseCase::new(fx.project_repo())
            .execute(missing)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Project not found");

        let err = CompleteProjectUseCase::new(fx.project_repo(), fx.task_repo())
            .execute(missing)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = DeleteProjectUseCase::new(fx.project_repo(), fx.task_repo())
            .execute(missing)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn earlier_deadline_with_auto_adjust_clamps_tasks() {
        let fx = Fixture::new();
        let project = fx.project(10).await;
        let task = fx.linked_task(&project, Some(8)).await;
        let new_deadline = fx.now() + Duration::days(5);

        let read = update_use_case(&fx, true)
            .execute(
                project.id,
                UpdateProjectRequest {
                    deadline: Some(new_deadline),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(read.deadline, new_deadline);
        let stored = fx.stored_task(task.id).await;
        assert_eq!(stored.deadline, Some(new_deadline));
        assert!(stored.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn earlier_deadline_without_auto_adjust_fails_and_keeps_storage() {
        let fx = Fixture::new();
        let project = fx.project(10).await;
        let task = fx.linked_task(&project, Some(8)).await;

        let err = update_use_case(&fx, false)
            .execute(
                project.id,
                UpdateProjectRequest {
                    title: Some("renamed".to_string()),
                    deadline: Some(fx.now() + Duration::days(5)),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Project contains task(s) with later deadline(s)");
        assert_eq!(fx.stored_task(task.id).await, task);
        let stored = fx.stored_project(project.id).await;
        assert_eq!(stored.deadline, project.deadline);
        assert_eq!(stored.title, project.title);
    }

    #[tokio::test]
    async fn update_rejects_past_deadline() {
        let fx = Fixture::new();
        let project = fx.project(10).await;

        let err = update_use_case(&fx, true)
            .execute(
                project.id,
                UpdateProjectRequest {
                    deadline: Some(fx.now() - Duration::hours(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Project deadline has passed");
    }

    #[tokio::test]
    async fn title_only_update_leaves_deadline() {
        let fx = Fixture::new();
        let project = fx.project(10).await;

        let read = update_use_case(&fx, false)
            .execute(
                project.id,
                UpdateProjectRequest {
                    title: Some("  Renamed  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(read.title, "Renamed");
        assert_eq!(read.deadline, project.deadline);
    }

    #[tokio::test]
    async fn complete_requires_all_tasks_done_then_reopen() {
        let fx = Fixture::new();
        let project = fx.project(10).await;
        let mut task = fx.linked_task(&project, None).await;
        let complete = CompleteProjectUseCase::new(fx.project_repo(), fx.task_repo());

        let err = complete.execute(project.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        task.mark_as_completed().unwrap();
        fx.tasks.update(task).await.unwrap();
        assert!(complete.execute(project.id).await.unwrap().is_completed);

        let err = complete.execute(project.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let reopen = ReopenProjectUseCase::new(fx.project_repo());
        assert!(!reopen.execute(project.id).await.unwrap().is_completed);
        assert_eq!(
            reopen.execute(project.id).await.unwrap_err().kind(),
            ErrorKind::Conflict
        );
    }

    #[tokio::test]
    async fn delete_unlinks_tasks() {
        let fx = Fixture::new();
        let project = fx.project(10).await;
        let task = fx.linked_task(&project, None).await;

        DeleteProjectUseCase::new(fx.project_repo(), fx.task_repo())
            .execute(project.id)
            .await
            .unwrap();

        assert!(fx.projects.is_empty().await);
        assert_eq!(fx.stored_task(task.id).await.project_id, None);
    }

    #[tokio::test]
    async fn list_project_tasks_only_returns_linked_ones() {
        let fx = Fixture::new();
        let project = fx.project(10).await;
        let linked = fx.linked_task(&project, Some(2)).await;
        fx.task(None).await;

        let reads = ListProjectTasksUseCase::new(fx.project_repo(), fx.task_repo(), fx.clock())
            .execute(project.id)
            .await
            .unwrap();

        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].id, linked.id);
        assert!(!reads[0].is_overdue);

        let all = ListProjectsUseCase::new(fx.project_repo())
            .execute()
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }
}
