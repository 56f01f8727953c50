//! TaskRepository port.

use async_trait::async_trait;

use super::repository::RepoResult;
use crate::domain::{ProjectId, Task, TaskId};

/// Storage capability set for tasks, plus the one project-scoped query the
/// rules need.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;

    async fn get_all(&self) -> RepoResult<Vec<Task>>;

    /// All tasks currently linked to `project_id`.
    async fn get_by_project_id(&self, project_id: ProjectId) -> RepoResult<Vec<Task>>;

    async fn save(&self, task: Task) -> RepoResult<Task>;

    async fn update(&self, task: Task) -> RepoResult<Task>;

    async fn delete(&self, id: TaskId) -> RepoResult<()>;
}
