//! SQLite-backed repositories (sqlx).
//!
//! Timestamps are stored as RFC 3339 text through sqlx's chrono support and
//! ids as bare ULID strings. `is_overdue` is never stored.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::debug;
use ulid::Ulid;

use crate::domain::{Id, IdMarker, Project, ProjectId, Task, TaskId};
use crate::ports::{ProjectRepository, RepoResult, RepositoryError, TaskRepository};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id           TEXT PRIMARY KEY NOT NULL,
        title        TEXT NOT NULL,
        deadline     TEXT NOT NULL,
        is_completed INTEGER NOT NULL DEFAULT 0,
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id           TEXT PRIMARY KEY NOT NULL,
        title        TEXT NOT NULL,
        description  TEXT,
        deadline     TEXT,
        is_completed INTEGER NOT NULL DEFAULT 0,
        project_id   TEXT REFERENCES projects(id) ON DELETE SET NULL,
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
];

const PROJECT_COLUMNS: &str = "id, title, deadline, is_completed, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, deadline, is_completed, project_id, created_at, updated_at";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::backend(err)
    }
}

/// Open (creating if needed) the database at `url` and bootstrap the schema.
pub async fn connect(url: &str) -> RepoResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Private in-memory database on a single long-lived connection.
pub async fn connect_in_memory() -> RepoResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> RepoResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("sqlite schema ready");
    Ok(())
}

fn id_to_db<T: IdMarker>(id: Id<T>) -> String {
    id.as_ulid().to_string()
}

fn id_from_db<T: IdMarker>(raw: &str) -> RepoResult<Id<T>> {
    Ulid::from_string(raw)
        .map(Id::from_ulid)
        .map_err(|e| RepositoryError::Corrupt(format!("bad id `{raw}`: {e}")))
}

fn map_insert_error(err: sqlx::Error, entity: &'static str, id: String) -> RepositoryError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => RepositoryError::AlreadyExists { entity, id },
        _ => RepositoryError::backend(err),
    }
}

fn project_from_row(row: &SqliteRow) -> RepoResult<Project> {
    let id: String = row.try_get("id")?;
    let deadline: DateTime<Utc> = row.try_get("deadline")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Project::restore(
        id_from_db(&id)?,
        row.try_get::<String, _>("title")?,
        deadline,
        row.try_get::<bool, _>("is_completed")?,
        created_at,
        updated_at,
    ))
}

fn task_from_row(row: &SqliteRow) -> RepoResult<Task> {
    let id: String = row.try_get("id")?;
    let project_id: Option<String> = row.try_get("project_id")?;
    Ok(Task {
        id: id_from_db(&id)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        deadline: row.try_get("deadline")?,
        is_completed: row.try_get("is_completed")?,
        project_id: project_id.as_deref().map(id_from_db).transpose()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Repository for project rows.
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn get_by_id(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id_to_db(id))
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn get_all(&self) -> RepoResult<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(project_from_row).collect()
    }

    async fn save(&self, mut project: Project) -> RepoResult<Project> {
        project.collect_domain_events();
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, deadline, is_completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id_to_db(project.id))
        .bind(&project.title)
        .bind(project.deadline)
        .bind(project.is_completed)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "project", project.id.to_string()))?;

        debug!(project_id = %project.id, "project inserted");
        Ok(project)
    }

    async fn update(&self, mut project: Project) -> RepoResult<Project> {
        project.collect_domain_events();
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                title = ?,
                deadline = ?,
                is_completed = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(project.deadline)
        .bind(project.is_completed)
        .bind(project.updated_at)
        .bind(id_to_db(project.id))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::MissingRow {
                entity: "project",
                id: project.id.to_string(),
            });
        }
        debug!(project_id = %project.id, "project updated");
        Ok(project)
    }

    async fn delete(&self, id: ProjectId) -> RepoResult<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id_to_db(id))
            .execute(&self.pool)
            .await?;
        debug!(project_id = %id, "project deleted");
        Ok(())
    }
}

/// Repository for task rows.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id_to_db(id))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_from_row).transpose()
    }

    async fn get_all(&self) -> RepoResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn get_by_project_id(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ? ORDER BY created_at, id"
        ))
        .bind(id_to_db(project_id))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn save(&self, task: Task) -> RepoResult<Task> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, deadline, is_completed,
                project_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id_to_db(task.id))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.is_completed)
        .bind(task.project_id.map(id_to_db))
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "task", task.id.to_string()))?;

        debug!(task_id = %task.id, "task inserted");
        Ok(task)
    }

    async fn update(&self, task: Task) -> RepoResult<Task> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                title = ?,
                description = ?,
                deadline = ?,
                is_completed = ?,
                project_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.is_completed)
        .bind(task.project_id.map(id_to_db))
        .bind(task.updated_at)
        .bind(id_to_db(task.id))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::MissingRow {
                entity: "task",
                id: task.id.to_string(),
            });
        }
        debug!(task_id = %task.id, "task updated");
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> RepoResult<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id_to_db(id))
            .execute(&self.pool)
            .await?;
        debug!(task_id = %id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SubsecRound};

    // RFC 3339 text keeps sub-second precision, but pin it anyway so
    // equality after a round trip is exact.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }

    fn project() -> Project {
        let now = now();
        Project::new(
            ProjectId::from_ulid(Ulid::new()),
            "sqlite project",
            now + Duration::days(5),
            now,
        )
    }

    fn task(deadline: Option<DateTime<Utc>>) -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            "sqlite task",
            Some("details".to_string()),
            deadline,
            now(),
        )
    }

    async fn repos() -> (SqliteProjectRepository, SqliteTaskRepository) {
        let pool = connect_in_memory().await.unwrap();
        (
            SqliteProjectRepository::new(pool.clone()),
            SqliteTaskRepository::new(pool),
        )
    }

    #[tokio::test]
    async fn project_roundtrip() {
        let (projects, _) = repos().await;
        let saved = projects.save(project()).await.unwrap();

        let loaded = projects.get_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded, saved);

        let mut changed = loaded;
        changed.mark_as_completed(&[]).unwrap();
        changed.updated_at = changed.updated_at.trunc_subsecs(6);
        projects.update(changed.clone()).await.unwrap();

        let reloaded = projects.get_by_id(saved.id).await.unwrap().unwrap();
        assert!(reloaded.is_completed);
        assert_eq!(projects.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn task_link_survives_storage_and_filters_by_project() {
        let (projects, tasks) = repos().await;
        let p = projects.save(project()).await.unwrap();

        let mut linked = task(Some(p.deadline - Duration::days(1)));
        linked.assign_to_project(p.id, Some(p.deadline)).unwrap();
        linked.updated_at = linked.updated_at.trunc_subsecs(6);
        let linked = tasks.save(linked).await.unwrap();
        tasks.save(task(None)).await.unwrap();

        let found = tasks.get_by_project_id(p.id).await.unwrap();
        assert_eq!(found, vec![linked.clone()]);
        assert_eq!(tasks.get_all().await.unwrap().len(), 2);
        assert_eq!(
            tasks.get_by_id(linked.id).await.unwrap().unwrap().project_id,
            Some(p.id)
        );
    }

    #[tokio::test]
    async fn deleting_a_project_unlinks_its_tasks() {
        let (projects, tasks) = repos().await;
        let p = projects.save(project()).await.unwrap();
        let mut t = task(None);
        t.assign_to_project(p.id, None).unwrap();
        let t = tasks.save(t).await.unwrap();

        projects.delete(p.id).await.unwrap();

        assert!(projects.get_by_id(p.id).await.unwrap().is_none());
        let orphan = tasks.get_by_id(t.id).await.unwrap().unwrap();
        assert_eq!(orphan.project_id, None);
    }

    #[tokio::test]
    async fn duplicate_and_missing_rows_are_reported() {
        let (_, tasks) = repos().await;
        let t = tasks.save(task(None)).await.unwrap();

        let dup = tasks.save(t.clone()).await.unwrap_err();
        assert!(matches!(dup, RepositoryError::AlreadyExists { entity: "task", .. }));

        let missing = tasks.update(task(None)).await.unwrap_err();
        assert!(matches!(missing, RepositoryError::MissingRow { entity: "task", .. }));
    }
}
