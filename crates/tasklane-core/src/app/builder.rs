//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - フラグは設定値として注入し、グローバル状態を持たない

use std::sync::Arc;

use super::handler::ProjectDeadlineChangedHandler;
use super::project_use_cases::{
    CompleteProjectUseCase, CreateProjectUseCase, DeleteProjectUseCase, GetProjectUseCase,
    ListProjectTasksUseCase, ListProjectsUseCase, ReopenProjectUseCase, UpdateProjectUseCase,
};
use super::status::SummarizeTasksUseCase;
use super::task_use_cases::{
    CompleteTaskUseCase, CreateTaskUseCase, DeleteTaskUseCase, GetFilteredTasksUseCase,
    GetTaskUseCase, LinkTaskToProjectUseCase, ReopenTaskUseCase, UnlinkTaskFromProjectUseCase,
    UpdateTaskUseCase,
};
use crate::config::Settings;
use crate::domain::ProjectCompletionService;
use crate::impls::{InMemoryProjectRepository, InMemoryTaskRepository};
use crate::ports::{Clock, IdGenerator, ProjectRepository, SystemClock, TaskRepository, UlidGenerator};

/// AppBuilder はユースケース一式を構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .settings(&settings)
///     .project_repository(projects)
///     .task_repository(tasks)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - repository は必須。未設定なら build() が BuildError を返す
/// - clock / id generator は省略時に SystemClock / UlidGenerator
pub struct AppBuilder {
    projects: Option<Arc<dyn ProjectRepository>>,
    tasks: Option<Arc<dyn TaskRepository>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    auto_complete_projects: bool,
    auto_adjust_task_deadlines: bool,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing component: {0}. It must be provided before build().")]
    MissingComponent(&'static str),
}

impl AppBuilder {
    /// 新しい AppBuilder を作成（フラグは Settings の既定値）
    pub fn new() -> Self {
        let defaults = Settings::default();
        Self {
            projects: None,
            tasks: None,
            clock: None,
            ids: None,
            auto_complete_projects: defaults.auto_complete_projects,
            auto_adjust_task_deadlines: defaults.auto_adjust_task_deadlines,
        }
    }

    /// Take both feature flags from `settings`.
    pub fn settings(self, settings: &Settings) -> Self {
        self.auto_complete_projects(settings.auto_complete_projects)
            .auto_adjust_task_deadlines(settings.auto_adjust_task_deadlines)
    }

    pub fn auto_complete_projects(mut self, enabled: bool) -> Self {
        self.auto_complete_projects = enabled;
        self
    }

    pub fn auto_adjust_task_deadlines(mut self, enabled: bool) -> Self {
        self.auto_adjust_task_deadlines = enabled;
        self
    }

    pub fn project_repository(mut self, projects: Arc<dyn ProjectRepository>) -> Self {
        self.projects = Some(projects);
        self
    }

    pub fn task_repository(mut self, tasks: Arc<dyn TaskRepository>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Both in-memory repositories.
    pub fn in_memory(self) -> Self {
        self.project_repository(Arc::new(InMemoryProjectRepository::new()))
            .task_repository(Arc::new(InMemoryTaskRepository::new()))
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// AppBuilder を構築して App を生成
    ///
    /// # 検証
    /// - project / task repository が設定されているか
    /// - 不足があれば BuildError::MissingComponent を返す
    pub fn build(self) -> Result<App, BuildError> {
        let projects = self
            .projects
            .ok_or(BuildError::MissingComponent("project repository"))?;
        let tasks = self
            .tasks
            .ok_or(BuildError::MissingComponent("task repository"))?;
        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids: Arc<dyn IdGenerator> = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(clock.clone())));

        let completion = ProjectCompletionService::new(self.auto_complete_projects);
        let deadline_handler = Arc::new(ProjectDeadlineChangedHandler::new(tasks.clone()));

        Ok(App {
            create_project: CreateProjectUseCase::new(projects.clone(), ids.clone(), clock.clone()),
            get_project: GetProjectUseCase::new(projects.clone()),
            list_projects: ListProjectsUseCase::new(projects.clone()),
            update_project: UpdateProjectUseCase::new(
                projects.clone(),
                deadline_handler,
                clock.clone(),
                self.auto_adjust_task_deadlines,
            ),
            complete_project: CompleteProjectUseCase::new(projects.clone(), tasks.clone()),
            reopen_project: ReopenProjectUseCase::new(projects.clone()),
            delete_project: DeleteProjectUseCase::new(projects.clone(), tasks.clone()),
            list_project_tasks: ListProjectTasksUseCase::new(
                projects.clone(),
                tasks.clone(),
                clock.clone(),
            ),
            create_task: CreateTaskUseCase::new(tasks.clone(), ids, clock.clone()),
            get_task: GetTaskUseCase::new(tasks.clone(), clock.clone()),
            update_task: UpdateTaskUseCase::new(tasks.clone(), projects.clone(), clock.clone()),
            complete_task: CompleteTaskUseCase::new(
                tasks.clone(),
                projects.clone(),
                completion,
                clock.clone(),
            ),
            reopen_task: ReopenTaskUseCase::new(
                tasks.clone(),
                projects.clone(),
                completion,
                clock.clone(),
            ),
            delete_task: DeleteTaskUseCase::new(tasks.clone()),
            link_task: LinkTaskToProjectUseCase::new(tasks.clone(), projects.clone(), clock.clone()),
            unlink_task: UnlinkTaskFromProjectUseCase::new(
                tasks.clone(),
                projects.clone(),
                clock.clone(),
            ),
            filter_tasks: GetFilteredTasksUseCase::new(tasks.clone(), clock.clone()),
            summarize_tasks: SummarizeTasksUseCase::new(projects, tasks, clock),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App はワイヤリング済みのユースケース一式
pub struct App {
    pub create_project: CreateProjectUseCase,
    pub get_project: GetProjectUseCase,
    pub list_projects: ListProjectsUseCase,
    pub update_project: UpdateProjectUseCase,
    pub complete_project: CompleteProjectUseCase,
    pub reopen_project: ReopenProjectUseCase,
    pub delete_project: DeleteProjectUseCase,
    pub list_project_tasks: ListProjectTasksUseCase,
    pub create_task: CreateTaskUseCase,
    pub get_task: GetTaskUseCase,
    pub update_task: UpdateTaskUseCase,
    pub complete_task: CompleteTaskUseCase,
    pub reopen_task: ReopenTaskUseCase,
    pub delete_task: DeleteTaskUseCase,
    pub link_task: LinkTaskToProjectUseCase,
    pub unlink_task: UnlinkTaskFromProjectUseCase,
    pub filter_tasks: GetFilteredTasksUseCase,
    pub summarize_tasks: SummarizeTasksUseCase,
}
