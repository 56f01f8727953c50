//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてユースケースを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: ユースケース一式の構築とワイヤリング
//! - **project_use_cases / task_use_cases**: 読み込み → ルール適用 → 永続化 → read model
//! - **ProjectDeadlineChangedHandler**: 期限変更イベントをタスクへ波及
//! - **SummarizeTasksUseCase**: タスク件数の集計

pub mod builder;
pub mod dto;
pub mod error;
pub mod handler;
pub mod project_use_cases;
pub mod status;
pub mod task_use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::dto::{
    CreateProjectRequest, CreateTaskRequest, ProjectRead, TaskFilter, TaskRead,
    UpdateProjectRequest, UpdateTaskRequest,
};
pub use self::error::{AppError, AppResult};
pub use self::handler::{EventHandler, ProjectDeadlineChangedHandler};
pub use self::project_use_cases::{
    CompleteProjectUseCase, CreateProjectUseCase, DeleteProjectUseCase, GetProjectUseCase,
    ListProjectTasksUseCase, ListProjectsUseCase, ReopenProjectUseCase, UpdateProjectUseCase,
};
pub use self::status::{SummarizeTasksUseCase, TaskSummary};
pub use self::task_use_cases::{
    CompleteTaskUseCase, CreateTaskUseCase, DeleteTaskUseCase, GetFilteredTasksUseCase,
    GetTaskUseCase, LinkTaskToProjectUseCase, ReopenTaskUseCase, UnlinkTaskFromProjectUseCase,
    UpdateTaskUseCase,
};
