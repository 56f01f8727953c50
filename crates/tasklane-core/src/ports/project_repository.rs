//! ProjectRepository port.

use async_trait::async_trait;

use super::repository::RepoResult;
use crate::domain::{Project, ProjectId};

/// Storage capability set for projects.
///
/// Implementations: `InMemoryProjectRepository` (tests, dev) and
/// `SqliteProjectRepository`.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn get_by_id(&self, id: ProjectId) -> RepoResult<Option<Project>>;

    async fn get_all(&self) -> RepoResult<Vec<Project>>;

    /// Insert a new project and return it as stored.
    async fn save(&self, project: Project) -> RepoResult<Project>;

    /// Overwrite an existing project and return it as stored.
    async fn update(&self, project: Project) -> RepoResult<Project>;

    /// Remove a project. Deleting an unknown id is not an error.
    async fn delete(&self, id: ProjectId) -> RepoResult<()>;
}
