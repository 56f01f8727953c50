//! InMemory repositories - 開発・テスト用の正本
//!
//! # 実装詳細
//! - HashMap<Id, Entity> を tokio の Mutex で保護
//! - 取得時は clone を返す（呼び出し側の変更は update するまで反映されない）
//! - get_all は created_at → id の順で安定ソート

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Project, ProjectId, Task, TaskId};
use crate::ports::{ProjectRepository, RepoResult, RepositoryError, TaskRepository};

/// InMemoryProjectRepository は開発用の Project ストア
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<Mutex<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects (for tests).
    pub async fn len(&self) -> usize {
        self.projects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.lock().await.is_empty()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn get_by_id(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        Ok(self.projects.lock().await.get(&id).cloned())
    }

    async fn get_all(&self) -> RepoResult<Vec<Project>> {
        let mut all: Vec<Project> = self.projects.lock().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn save(&self, mut project: Project) -> RepoResult<Project> {
        let mut projects = self.projects.lock().await;
        if projects.contains_key(&project.id) {
            return Err(RepositoryError::AlreadyExists {
                entity: "project",
                id: project.id.to_string(),
            });
        }
        // pending events never reach storage
        project.collect_domain_events();
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&self, mut project: Project) -> RepoResult<Project> {
        let mut projects = self.projects.lock().await;
        let Some(slot) = projects.get_mut(&project.id) else {
            return Err(RepositoryError::MissingRow {
                entity: "project",
                id: project.id.to_string(),
            });
        };
        project.collect_domain_events();
        *slot = project.clone();
        Ok(project)
    }

    async fn delete(&self, id: ProjectId) -> RepoResult<()> {
        self.projects.lock().await.remove(&id);
        Ok(())
    }
}

/// InMemoryTaskRepository は開発用の Task ストア
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<Mutex<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }
}

fn sorted(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        Ok(self.tasks.lock().await.get(&id).cloned())
    }

    async fn get_all(&self) -> RepoResult<Vec<Task>> {
        Ok(sorted(self.tasks.lock().await.values().cloned().collect()))
    }

    async fn get_by_project_id(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        let tasks = self.tasks.lock().await;
        Ok(sorted(
            tasks
                .values()
                .filter(|task| task.project_id == Some(project_id))
                .cloned()
                .collect(),
        ))
    }

    async fn save(&self, task: Task) -> RepoResult<Task> {
        let mut tasks = self.tasks.lock().await;
        if tasks.contains_key(&task.id) {
            return Err(RepositoryError::AlreadyExists {
                entity: "task",
                id: task.id.to_string(),
            });
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> RepoResult<Task> {
        let mut tasks = self.tasks.lock().await;
        let Some(slot) = tasks.get_mut(&task.id) else {
            return Err(RepositoryError::MissingRow {
                entity: "task",
                id: task.id.to_string(),
            });
        };
        *slot = task.clone();
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> RepoResult<()> {
        self.tasks.lock().await.remove(&id);
        Ok(())
    }
}
