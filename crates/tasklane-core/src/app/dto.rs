//! DTO - ユースケースの入出力
//!
//! Requests carry optional fields meaning "leave unchanged". Read models are
//! flat snapshots; `TaskRead::is_overdue` is derived at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, Project, ProjectId, Task, TaskId};

/// Trimmed title, rejecting blank input.
pub(crate) fn validated_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("Title must not be empty"));
    }
    Ok(title.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Equality predicates combined with AND. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub is_overdue: Option<bool>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        self.project_id.is_none_or(|pid| task.project_id == Some(pid))
            && self.is_completed.is_none_or(|done| task.is_completed == done)
            && self.is_overdue.is_none_or(|late| task.is_overdue_at(now) == late)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRead {
    pub id: ProjectId,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectRead {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
            deadline: project.deadline,
            is_completed: project.is_completed,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRead {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub project_id: Option<ProjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_overdue: bool,
}

impl TaskRead {
    /// Snapshot of `task` with `is_overdue` evaluated at `now`.
    pub fn at(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: task.deadline,
            is_completed: task.is_completed,
            project_id: task.project_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
            is_overdue: task.is_overdue_at(now),
        }
    }
}
