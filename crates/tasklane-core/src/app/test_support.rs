//! Shared wiring for the use-case tests: in-memory repositories and a pinned
//! clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Project, ProjectId, Task, TaskId};
use crate::impls::{InMemoryProjectRepository, InMemoryTaskRepository};
use crate::ports::{Clock, FixedClock, IdGenerator, ProjectRepository, TaskRepository, UlidGenerator};

pub(crate) struct Fixture {
    pub projects: InMemoryProjectRepository,
    pub tasks: InMemoryTaskRepository,
    pub clock: Arc<FixedClock>,
    pub ids: Arc<dyn IdGenerator>,
}

impl Fixture {
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::new(Self::start()));
        Self {
            projects: InMemoryProjectRepository::new(),
            tasks: InMemoryTaskRepository::new(),
            ids: Arc::new(UlidGenerator::new(clock.clone())),
            clock,
        }
    }

    /// Pinned at construction. Entities stamp `updated_at` from the wall
    /// clock, so this stays close to it.
    pub fn start() -> DateTime<Utc> {
        Utc::now()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn project_repo(&self) -> Arc<dyn ProjectRepository> {
        Arc::new(self.projects.clone())
    }

    pub fn task_repo(&self) -> Arc<dyn TaskRepository> {
        Arc::new(self.tasks.clone())
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub async fn project(&self, deadline_in_days: i64) -> Project {
        let now = self.now();
        let project = Project::new(
            self.ids.generate_project_id(),
            "fixture project",
            now + Duration::days(deadline_in_days),
            now,
        );
        self.projects.save(project).await.unwrap()
    }

    pub async fn task(&self, deadline_in_days: Option<i64>) -> Task {
        let now = self.now();
        let task = Task::new(
            self.ids.generate_task_id(),
            "fixture task",
            None,
            deadline_in_days.map(|d| now + Duration::days(d)),
            now,
        );
        self.tasks.save(task).await.unwrap()
    }

    pub async fn linked_task(&self, project: &Project, deadline_in_days: Option<i64>) -> Task {
        let mut task = self.task(deadline_in_days).await;
        task.assign_to_project(project.id, Some(project.deadline))
            .unwrap();
        self.tasks.update(task).await.unwrap()
    }

    pub async fn stored_project(&self, id: ProjectId) -> Project {
        self.projects.get_by_id(id).await.unwrap().unwrap()
    }

    pub async fn stored_task(&self, id: TaskId) -> Task {
        self.tasks.get_by_id(id).await.unwrap().unwrap()
    }
}
