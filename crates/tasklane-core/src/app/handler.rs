//! Event handlers - ドメインイベントへの反応
//!
//! # 学習ポイント
//! - ジェネリック trait (EventHandler<E>)
//! - ハンドラは repository を通して副作用を永続化する
//! - 呼び出し側（ユースケース）がイベントを drain して明示的に渡す

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::error::AppResult;
use crate::domain::{DeadlineEnforcementService, DomainEvent, ProjectDeadlineChangedEvent};
use crate::ports::TaskRepository;

/// EventHandler は特定のイベント型 E に反応する
///
/// `Ctx` is per-dispatch input owned by the caller (for the deadline cascade,
/// the auto-adjust flag).
#[async_trait]
pub trait EventHandler<E: Send + Sync>: Send + Sync {
    type Ctx: Send + Sync;
    type Output: Send;

    async fn handle(&self, event: &E, ctx: Self::Ctx) -> AppResult<Self::Output>;
}

/// Cascades a project deadline change onto the project's tasks.
pub struct ProjectDeadlineChangedHandler {
    tasks: Arc<dyn TaskRepository>,
    enforcement: DeadlineEnforcementService,
}

impl ProjectDeadlineChangedHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self {
            tasks,
            enforcement: DeadlineEnforcementService::new(),
        }
    }

    /// Route any drained domain event. Returns the number of tasks adjusted.
    pub async fn dispatch(&self, event: &DomainEvent, auto_adjust: bool) -> AppResult<usize> {
        match event {
            DomainEvent::ProjectDeadlineChanged(e) => self.handle(e, auto_adjust).await,
        }
    }
}

#[async_trait]
impl EventHandler<ProjectDeadlineChangedEvent> for ProjectDeadlineChangedHandler {
    type Ctx = bool;
    type Output = usize;

    async fn handle(
        &self,
        event: &ProjectDeadlineChangedEvent,
        auto_adjust: bool,
    ) -> AppResult<usize> {
        let mut tasks = self.tasks.get_by_project_id(event.project_id).await?;
        if tasks.is_empty() {
            debug!(project_id = %event.project_id, "deadline changed on a project without tasks");
            return Ok(0);
        }

        let adjusted =
            self.enforcement
                .handle_project_deadline_changed(event, &mut tasks, auto_adjust)?;

        for task in tasks {
            self.tasks.update(task).await?;
        }

        info!(
            project_id = %event.project_id,
            adjusted,
            "task deadlines reconciled with project deadline"
        );
        Ok(adjusted)
    }
}
